//! Shamir's Secret Sharing over GF(256).
//!
//! Splits the master key encryption key into `shares` key shares such that
//! any `threshold` of them reconstruct it, and none fewer reveal anything.
//! Same construction HashiCorp Vault's `shamir` package uses: one random
//! polynomial of degree `threshold - 1` per secret byte, evaluated at
//! `x = 1..=shares`.

use rand::RngCore;
use zeroize::Zeroizing;

use crate::errors::{VaultError, VaultResult};

/// Bytes of overhead a combined share carries beyond the original secret
/// length (none -- shares are exactly secret-length plus one x-coordinate
/// byte stored alongside, not inline). Kept as a named constant because
/// callers size unseal-key-length checks against it.
pub const SHAMIR_OVERHEAD: usize = 1;

const GF256_EXP: [u8; 512] = build_exp_table();
const GF256_LOG: [u8; 256] = build_log_table();

const fn build_exp_table() -> [u8; 512] {
    let mut exp = [0u8; 512];
    let mut x: u16 = 1;
    let mut i = 0;
    while i < 255 {
        exp[i] = x as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= 0x11d;
        }
        i += 1;
    }
    i = 255;
    while i < 512 {
        exp[i] = exp[i - 255];
        i += 1;
    }
    exp
}

const fn build_log_table() -> [u8; 256] {
    let mut log = [0u8; 256];
    let exp = build_exp_table();
    let mut i = 0;
    while i < 255 {
        log[exp[i] as usize] = i as u8;
        i += 1;
    }
    log
}

fn gf_mul(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    let log_sum = GF256_LOG[a as usize] as usize + GF256_LOG[b as usize] as usize;
    GF256_EXP[log_sum]
}

fn gf_div(a: u8, b: u8) -> VaultResult<u8> {
    if b == 0 {
        return Err(VaultError::Vault("division by zero in GF(256)".to_string()));
    }
    if a == 0 {
        return Ok(0);
    }
    let log_diff = GF256_LOG[a as usize] as i32 - GF256_LOG[b as usize] as i32;
    let log_diff = ((log_diff % 255) + 255) % 255;
    Ok(GF256_EXP[log_diff as usize])
}

/// One share: the x-coordinate followed by one evaluated y-byte per secret byte.
pub struct ShamirSecret;

impl ShamirSecret {
    /// Split `secret` into `shares` shares, any `threshold` of which reconstruct it.
    pub fn split(secret: &[u8], shares: u8, threshold: u8) -> VaultResult<Zeroizing<Vec<Vec<u8>>>> {
        if threshold < 1 || threshold > shares {
            return Err(VaultError::Vault(
                "threshold must be between 1 and shares".to_string(),
            ));
        }
        if shares < 1 || shares > 255 {
            return Err(VaultError::Vault("shares must be between 1 and 255".to_string()));
        }
        if secret.is_empty() {
            return Err(VaultError::Vault("secret must not be empty".to_string()));
        }

        let mut rng = rand::thread_rng();
        let mut out: Vec<Vec<u8>> = (1..=shares).map(|x| vec![x]).collect();

        for &secret_byte in secret {
            let mut coeffs = vec![0u8; threshold as usize];
            coeffs[0] = secret_byte;
            if threshold > 1 {
                rng.fill_bytes(&mut coeffs[1..]);
            }

            for (i, share) in out.iter_mut().enumerate() {
                let x = (i as u8).wrapping_add(1);
                let mut y = 0u8;
                let mut x_pow = 1u8;
                for &coeff in &coeffs {
                    y ^= gf_mul(coeff, x_pow);
                    x_pow = gf_mul(x_pow, x);
                }
                share.push(y);
            }
        }

        Ok(Zeroizing::new(out))
    }

    /// Reconstruct the secret from a set of shares (at least `threshold` of
    /// the originals) via Lagrange interpolation at x = 0. Returns `None` if
    /// the shares are malformed (empty, mismatched length, or duplicate x).
    pub fn combine(shares: Vec<Vec<u8>>) -> Option<Vec<u8>> {
        if shares.is_empty() {
            return None;
        }
        let share_len = shares[0].len();
        if share_len < 2 || shares.iter().any(|s| s.len() != share_len) {
            return None;
        }

        let xs: Vec<u8> = shares.iter().map(|s| s[0]).collect();
        if xs.iter().any(|&x| x == 0) {
            return None;
        }
        for i in 0..xs.len() {
            for j in (i + 1)..xs.len() {
                if xs[i] == xs[j] {
                    return None;
                }
            }
        }

        let secret_len = share_len - 1;
        let mut secret = vec![0u8; secret_len];

        for byte_idx in 0..secret_len {
            let mut result = 0u8;
            for i in 0..shares.len() {
                let xi = xs[i];
                let yi = shares[i][byte_idx + 1];

                let mut numerator = 1u8;
                let mut denominator = 1u8;
                for j in 0..shares.len() {
                    if i == j {
                        continue;
                    }
                    let xj = xs[j];
                    numerator = gf_mul(numerator, xj);
                    denominator = gf_mul(denominator, xi ^ xj);
                }

                let term = match gf_div(numerator, denominator) {
                    Ok(basis) => gf_mul(yi, basis),
                    Err(_) => return None,
                };
                result ^= term;
            }
            secret[byte_idx] = result;
        }

        Some(secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_and_combine_round_trip() {
        let secret = b"super-secret-master-key-material";
        let shares = ShamirSecret::split(secret, 5, 3).unwrap();
        let subset = vec![shares[0].clone(), shares[2].clone(), shares[4].clone()];
        let recovered = ShamirSecret::combine(subset).unwrap();
        assert_eq!(recovered, secret.to_vec());
    }

    #[test]
    fn combine_rejects_duplicate_x_coordinates() {
        let secret = b"abc";
        let shares = ShamirSecret::split(secret, 3, 2).unwrap();
        let dup = vec![shares[0].clone(), shares[0].clone()];
        assert!(ShamirSecret::combine(dup).is_none());
    }

    #[test]
    fn threshold_must_not_exceed_shares() {
        assert!(ShamirSecret::split(b"abc", 2, 3).is_err());
    }
}
