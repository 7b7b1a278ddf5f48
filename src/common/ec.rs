// Galois field GF(256) arithmetic
//------------------------------------------------------------------------------

// Field generated by the primitive polynomial x^8 + x^4 + x^3 + x^2 + 1
const PRIMITIVE_POLYNOMIAL: usize = 0x11D;

const fn generate_exp_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut value: usize = 1;
    let mut i = 0;
    while i < 256 {
        table[i] = value as u8;
        value <<= 1;
        if value & 0x100 != 0 {
            value ^= PRIMITIVE_POLYNOMIAL;
        }
        i += 1;
    }
    table
}

const fn generate_log_table() -> [u8; 256] {
    let exp = generate_exp_table();
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 255 {
        table[exp[i] as usize] = i as u8;
        i += 1;
    }
    table
}

// Exponent to field element
pub static EXP_TABLE: [u8; 256] = generate_exp_table();

// Field element to exponent; undefined for zero, callers skip zeros
pub static LOG_TABLE: [u8; 256] = generate_log_table();

fn gf_mul(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    let log_sum = LOG_TABLE[a as usize] as usize + LOG_TABLE[b as usize] as usize;
    EXP_TABLE[log_sum % 255]
}

// Reed-Solomon
//------------------------------------------------------------------------------

// Product of (x - α^0)(x - α^1)..(x - α^(degree-1)), returned as field
// exponents with the monic leading term omitted
fn generator_polynomial(degree: usize) -> Vec<u8> {
    debug_assert!((1..=64).contains(&degree), "Generator degree out of range: {degree}");

    let mut coeffs = vec![0u8; degree];
    coeffs[degree - 1] = 1;
    let mut root: u8 = 1;
    for _ in 0..degree {
        for j in 0..degree {
            coeffs[j] = gf_mul(coeffs[j], root);
            if j + 1 < degree {
                coeffs[j] ^= coeffs[j + 1];
            }
        }
        root = gf_mul(root, 2);
    }
    coeffs.into_iter().map(|c| LOG_TABLE[c as usize]).collect()
}

// Performs polynomial long division of the data polynomial (message
// codewords followed by ecc_count zero coefficients) by the generator
// polynomial; the remainder coefficients are the ecc codewords
pub fn ecc(block: &[u8], ecc_count: usize) -> Vec<u8> {
    let len = block.len();
    let gen_poly = generator_polynomial(ecc_count);

    let mut res = block.to_vec();
    res.resize(len + ecc_count, 0);

    for i in 0..len {
        let lead_coeff = res[i] as usize;
        if lead_coeff == 0 {
            continue;
        }

        let log_lead_coeff = LOG_TABLE[lead_coeff] as usize;
        for (u, v) in res[i + 1..].iter_mut().zip(gen_poly.iter()) {
            let mut log_sum = *v as usize + log_lead_coeff;
            debug_assert!(log_sum < 510, "Log sum has crossed 510: {log_sum}");
            if log_sum >= 255 {
                log_sum -= 255;
            }
            *u ^= EXP_TABLE[log_sum];
        }
    }

    res.split_off(len)
}
