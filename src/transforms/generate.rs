use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use uuid::{Builder, Uuid};

use crate::constants::{charset, defaults};
use crate::error::{Error, Result};
use crate::options::Options;
use crate::transforms::{Transform, Transformed};

/// Random source for the generators: seeded when the `seed` option is set so
/// that output can be reproduced, thread-local otherwise.
fn rng_for(options: &Options) -> Result<Box<dyn RngCore>> {
    Ok(match options.u64_opt("seed")? {
        Some(seed) => Box::new(StdRng::seed_from_u64(seed)),
        None => Box::new(rand::thread_rng()),
    })
}

/// Generates a password from the enabled character classes.
///
/// The random source is not cryptographically vetted; the generated values
/// are suitable for throwaway credentials only.
pub struct PasswordGenerator;

impl PasswordGenerator {
    pub fn new() -> Self {
        Self
    }

    fn charset(options: &Options) -> Result<Vec<char>> {
        let classes = [
            ("lowercase", charset::LOWERCASE),
            ("uppercase", charset::UPPERCASE),
            ("numbers", charset::NUMBERS),
            ("symbols", charset::SYMBOLS),
        ];
        let mut chars = Vec::new();
        for (key, class) in classes {
            if options.flag_or(key, true)? {
                chars.extend(class.chars());
            }
        }
        if chars.is_empty() {
            return Err(Error::option(
                "charset",
                "Select at least one character class",
            ));
        }
        Ok(chars)
    }
}

impl Transform for PasswordGenerator {
    fn transform(&self, _text: &str, options: &Options) -> Result<Transformed> {
        let length = options.usize_or("length", defaults::PASSWORD_LENGTH)?;
        if !(1..=defaults::PASSWORD_MAX_LENGTH).contains(&length) {
            return Err(Error::option(
                "length",
                format!(
                    "must be between 1 and {}, got {}",
                    defaults::PASSWORD_MAX_LENGTH,
                    length
                ),
            ));
        }
        let chars = Self::charset(options)?;
        let mut rng = rng_for(options)?;
        let password: String = (0..length)
            .map(|_| chars[rng.gen_range(0..chars.len())])
            .collect();
        Ok(Transformed::new(password).count("charset_size", chars.len()))
    }

    fn consumes_input(&self) -> bool {
        false
    }
}

/// Generates version 4 UUIDs, one per line
pub struct UuidGenerator;

impl UuidGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Random v4 UUID, drawn from `seeded` when reproducible output was asked
    fn next_uuid(seeded: Option<&mut StdRng>) -> Uuid {
        match seeded {
            Some(rng) => {
                let mut bytes = [0u8; 16];
                rng.fill_bytes(&mut bytes);
                // sets the version nibble to 4 and the variant bits to 10xx
                Builder::from_random_bytes(bytes).into_uuid()
            }
            None => Uuid::new_v4(),
        }
    }
}

impl Transform for UuidGenerator {
    fn transform(&self, _text: &str, options: &Options) -> Result<Transformed> {
        let count = options.usize_or("count", defaults::UUID_COUNT)?;
        if !(1..=defaults::UUID_MAX_COUNT).contains(&count) {
            return Err(Error::option(
                "count",
                format!(
                    "must be between 1 and {}, got {}",
                    defaults::UUID_MAX_COUNT,
                    count
                ),
            ));
        }
        let uppercase = options.flag_or("uppercase", false)?;
        let mut seeded = options.u64_opt("seed")?.map(StdRng::seed_from_u64);
        let uuids: Vec<String> = (0..count)
            .map(|_| {
                let id = Self::next_uuid(seeded.as_mut()).hyphenated().to_string();
                if uppercase {
                    id.to_uppercase()
                } else {
                    id
                }
            })
            .collect();
        Ok(Transformed::new(uuids.join("\n")).count("count", count))
    }

    fn consumes_input(&self) -> bool {
        false
    }
}
