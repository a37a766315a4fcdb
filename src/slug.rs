const ALPHABET: [char; 62] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I',
    'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', 'a', 'b',
    'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u',
    'v', 'w', 'x', 'y', 'z',
];

pub const GENERATED_SLUG_LEN: usize = 8;

pub fn generate_slug() -> String {
    nanoid::nanoid!(GENERATED_SLUG_LEN, &ALPHABET)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate_slug;

    #[test]
    fn generated_slugs_are_alphanumeric_and_valid() {
        for _ in 0..100 {
            let slug = generate_slug();
            assert_eq!(slug.len(), GENERATED_SLUG_LEN);
            assert!(slug.chars().all(|c| c.is_ascii_alphanumeric()));
            assert!(validate_slug(&slug).is_ok());
        }
    }
}
