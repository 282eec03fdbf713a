//! Reed-Solomon coding over GF(256)
//!
//! QR codes use RS over GF(256) with primitive polynomial
//! x^8 + x^4 + x^3 + x^2 + 1 (0x11D) and generator roots α^0 .. α^(n-1).
//! Codewords are stored highest degree first.

use crate::error::{Result, ScanError};

/// GF(256) field operations using log/exp tables
pub struct Gf256;

const PRIMITIVE: u16 = 0x11D;

const fn build_exp_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut x: u16 = 1;
    let mut i = 0;
    while i < 255 {
        table[i] = x as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= PRIMITIVE;
        }
        i += 1;
    }
    table[255] = 1;
    table
}

const fn build_log_table(exp: &[u8; 256]) -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 255 {
        table[exp[i] as usize] = i as u8;
        i += 1;
    }
    table
}

static EXP_TABLE: [u8; 256] = build_exp_table();
static LOG_TABLE: [u8; 256] = build_log_table(&EXP_TABLE);

impl Gf256 {
    /// Field multiplication
    pub fn mul(a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }
        let log_a = LOG_TABLE[a as usize] as usize;
        let log_b = LOG_TABLE[b as usize] as usize;
        EXP_TABLE[(log_a + log_b) % 255]
    }

    /// Field division; dividing by zero yields zero
    pub fn div(a: u8, b: u8) -> u8 {
        if a == 0 || b == 0 {
            return 0;
        }
        let log_a = LOG_TABLE[a as usize] as usize;
        let log_b = LOG_TABLE[b as usize] as usize;
        EXP_TABLE[(log_a + 255 - log_b) % 255]
    }

    /// `a` raised to the power `n`
    pub fn pow(a: u8, n: usize) -> u8 {
        if a == 0 {
            return if n == 0 { 1 } else { 0 };
        }
        let log_a = LOG_TABLE[a as usize] as usize;
        EXP_TABLE[(log_a * (n % 255)) % 255]
    }

    /// α^n
    pub fn exp(n: usize) -> u8 {
        EXP_TABLE[n % 255]
    }

    /// α^-n
    pub fn exp_neg(n: usize) -> u8 {
        EXP_TABLE[(255 - n % 255) % 255]
    }
}

/// Evaluate a polynomial stored lowest degree first
fn eval_ascending(poly: &[u8], x: u8) -> u8 {
    poly.iter()
        .rev()
        .fold(0u8, |acc, &coeff| Gf256::mul(acc, x) ^ coeff)
}

/// Reed-Solomon decoder for QR codes
pub struct ReedSolomonDecoder {
    num_ecc_codewords: usize,
}

impl ReedSolomonDecoder {
    /// Decoder for blocks carrying `num_ecc_codewords` check bytes
    pub fn new(num_ecc_codewords: usize) -> Self {
        Self { num_ecc_codewords }
    }

    /// Correct `received` in place
    ///
    /// Fails with `FormatError` when more than `ecc/2` codewords are wrong
    /// (or the damage is otherwise uncorrectable).
    pub fn decode(&self, received: &mut [u8]) -> Result<()> {
        let n = received.len();
        if n == 0 || n > 255 || self.num_ecc_codewords >= n {
            return Err(ScanError::FormatError("invalid Reed-Solomon block length"));
        }

        let syndrome = self.calculate_syndrome(received);
        if syndrome.iter().all(|&s| s == 0) {
            return Ok(());
        }

        let sigma = Self::find_error_locator(&syndrome);
        let degree = sigma.len() - 1;
        if degree == 0 || 2 * degree > self.num_ecc_codewords {
            return Err(ScanError::FormatError("too many Reed-Solomon errors"));
        }

        let error_positions = Self::find_error_positions(&sigma, n)?;
        let error_values = Self::find_error_values(&sigma, &syndrome, &error_positions, n)?;

        for (&pos, &value) in error_positions.iter().zip(&error_values) {
            received[pos] ^= value;
        }

        // Verify syndrome is now zero
        if self.calculate_syndrome(received).iter().any(|&s| s != 0) {
            return Err(ScanError::FormatError("uncorrectable Reed-Solomon block"));
        }

        Ok(())
    }

    /// S_i = r(α^i) with r read highest degree first
    fn calculate_syndrome(&self, received: &[u8]) -> Vec<u8> {
        (0..self.num_ecc_codewords)
            .map(|i| {
                let x = Gf256::exp(i);
                received
                    .iter()
                    .fold(0u8, |acc, &coeff| Gf256::mul(acc, x) ^ coeff)
            })
            .collect()
    }

    /// Berlekamp-Massey; returns the locator lowest degree first, trimmed
    fn find_error_locator(syndrome: &[u8]) -> Vec<u8> {
        let mut sigma = vec![1u8];
        let mut b = vec![1u8];
        let mut delta_b: u8 = 1;
        let mut l = 0usize;
        let mut m = 1usize;

        for i in 0..syndrome.len() {
            let mut delta = syndrome[i];
            for j in 1..=l.min(sigma.len() - 1) {
                delta ^= Gf256::mul(sigma[j], syndrome[i - j]);
            }

            if delta == 0 {
                m += 1;
                continue;
            }

            let previous = sigma.clone();
            let d = Gf256::div(delta, delta_b);
            if sigma.len() < b.len() + m {
                sigma.resize(b.len() + m, 0);
            }
            // sigma = sigma - d * x^m * b
            for (j, &coeff) in b.iter().enumerate() {
                sigma[j + m] ^= Gf256::mul(d, coeff);
            }

            if 2 * l <= i {
                b = previous;
                delta_b = delta;
                l = i + 1 - l;
                m = 1;
            } else {
                m += 1;
            }
        }

        while sigma.len() > 1 && sigma.last() == Some(&0) {
            sigma.pop();
        }
        sigma
    }

    /// Chien search: position `i` is in error when sigma(α^-(n-1-i)) == 0
    fn find_error_positions(sigma: &[u8], n: usize) -> Result<Vec<usize>> {
        let positions: Vec<usize> = (0..n)
            .filter(|&i| eval_ascending(sigma, Gf256::exp_neg(n - 1 - i)) == 0)
            .collect();

        if positions.len() != sigma.len() - 1 {
            return Err(ScanError::FormatError("error locator roots out of range"));
        }
        Ok(positions)
    }

    /// Forney algorithm: e_k = X_k * omega(X_k^-1) / sigma'(X_k^-1)
    fn find_error_values(
        sigma: &[u8],
        syndrome: &[u8],
        error_positions: &[usize],
        n: usize,
    ) -> Result<Vec<u8>> {
        // omega = syndrome * sigma mod x^(2t)
        let mut omega = vec![0u8; syndrome.len()];
        for (i, slot) in omega.iter_mut().enumerate() {
            for (j, &coeff) in sigma.iter().enumerate().take(i + 1) {
                *slot ^= Gf256::mul(coeff, syndrome[i - j]);
            }
        }

        // Formal derivative keeps the odd-degree terms
        let sigma_prime: Vec<u8> = sigma
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, &c)| if i % 2 == 1 { c } else { 0 })
            .collect();

        error_positions
            .iter()
            .map(|&pos| {
                let power = n - 1 - pos;
                let x_inv = Gf256::exp_neg(power);
                let omega_val = eval_ascending(&omega, x_inv);
                let sigma_prime_val = eval_ascending(&sigma_prime, x_inv);
                if sigma_prime_val == 0 {
                    return Err(ScanError::FormatError("error locator derivative is zero"));
                }
                Ok(Gf256::mul(Gf256::exp(power), Gf256::div(omega_val, sigma_prime_val)))
            })
            .collect()
    }
}

/// Reed-Solomon encoder producing QR error correction codewords
pub struct ReedSolomonEncoder {
    divisor: Vec<u8>,
}

impl ReedSolomonEncoder {
    /// Encoder emitting `degree` check bytes per block
    pub fn new(degree: usize) -> Self {
        // Generator (x - α^0)(x - α^1)...(x - α^(degree-1)), leading 1 dropped
        let mut divisor = vec![0u8; degree];
        if degree == 0 {
            return Self { divisor };
        }
        divisor[degree - 1] = 1;
        let mut root = 1u8;
        for _ in 0..degree {
            for j in 0..degree {
                divisor[j] = Gf256::mul(divisor[j], root);
                if j + 1 < degree {
                    divisor[j] ^= divisor[j + 1];
                }
            }
            root = Gf256::mul(root, 0x02);
        }
        Self { divisor }
    }

    /// Check bytes for `data`, highest degree first
    pub fn remainder(&self, data: &[u8]) -> Vec<u8> {
        let mut result = vec![0u8; self.divisor.len()];
        if result.is_empty() {
            return result;
        }
        for &byte in data {
            let factor = byte ^ result.remove(0);
            result.push(0);
            for (slot, &coeff) in result.iter_mut().zip(&self.divisor) {
                *slot ^= Gf256::mul(coeff, factor);
            }
        }
        result
    }

    /// `data` followed by its check bytes
    pub fn encode(&self, data: &[u8]) -> Vec<u8> {
        let mut block = data.to_vec();
        block.extend(self.remainder(data));
        block
    }
}
