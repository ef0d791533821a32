use rand::Rng;
use rand::seq::SliceRandom;

const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const DIGITS: &[u8] = b"0123456789";
const SPECIAL: &[u8] = b"@$!%*?&";

/// Generate a cryptographically secure random password
///
/// 20 characters drawn from letters, digits and `@$!%*?&`, with at least one
/// of each class so the result always satisfies the password policy.
pub fn generate_secure_password() -> String {
    const PASSWORD_LENGTH: usize = 20;

    let mut rng = rand::rng();
    let pick = |rng: &mut rand::rngs::ThreadRng, set: &[u8]| set[rng.random_range(0..set.len())];

    let mut bytes = vec![
        pick(&mut rng, LOWERCASE),
        pick(&mut rng, UPPERCASE),
        pick(&mut rng, DIGITS),
        pick(&mut rng, SPECIAL),
    ];

    let charset: Vec<u8> = [LOWERCASE, UPPERCASE, DIGITS, SPECIAL].concat();
    while bytes.len() < PASSWORD_LENGTH {
        bytes.push(pick(&mut rng, &charset));
    }

    bytes.shuffle(&mut rng);
    bytes.into_iter().map(char::from).collect()
}
