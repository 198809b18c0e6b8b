//! Soundex-style phonetic codes
//!
//! A code is the first letter of the name followed by three digits:
//!
//! | Letters                  | Digit |
//! |--------------------------|-------|
//! | B F P V                  | 1     |
//! | C G J K Q S X Z          | 2     |
//! | D T                      | 3     |
//! | L                        | 4     |
//! | M N                      | 5     |
//! | R                        | 6     |
//!
//! Vowels, H, W and Y produce no digit. A digit is appended only when it
//! differs from the previously appended digit. Short codes are padded with
//! `'0'`.

/// Code length: one letter plus three digits
pub const CODE_LENGTH: usize = 4;

/// Maps names to 4-character phonetic codes
#[derive(Clone, Copy, Debug, Default)]
pub struct PhoneticEncoder;

impl PhoneticEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Encode a name. Returns an empty string when uppercasing yields no `A-Z` letters.
    pub fn encode(&self, name: &str) -> String {
        let mut letters = name
            .chars()
            .flat_map(char::to_uppercase)
            .filter(|c| c.is_ascii_uppercase());

        let first = match letters.next() {
            Some(c) => c,
            None => return String::new(),
        };

        let mut code = String::with_capacity(CODE_LENGTH);
        code.push(first);

        let mut last_digit: Option<char> = None;
        for letter in letters {
            if code.len() >= CODE_LENGTH {
                break;
            }
            if let Some(digit) = digit_for(letter) {
                if last_digit != Some(digit) {
                    code.push(digit);
                    last_digit = Some(digit);
                }
            }
        }

        while code.len() < CODE_LENGTH {
            code.push('0');
        }
        code
    }
}

fn digit_for(letter: char) -> Option<char> {
    match letter {
        'B' | 'F' | 'P' | 'V' => Some('1'),
        'C' | 'G' | 'J' | 'K' | 'Q' | 'S' | 'X' | 'Z' => Some('2'),
        'D' | 'T' => Some('3'),
        'L' => Some('4'),
        'M' | 'N' => Some('5'),
        'R' => Some('6'),
        _ => None,
    }
}
