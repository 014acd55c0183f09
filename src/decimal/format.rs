use core::fmt;

use super::BigDecimal;

/// Lays out the value in scientific or engineering notation.
///
/// Values with a non-negative scale and an adjusted exponent of at least
/// -6 are written without an exponent.
fn layout(value: &BigDecimal, scientific: bool) -> String {
    if value.scale == 0 {
        return value.int_val.to_string();
    }

    let coeff = value.int_val.magnitude_str(10);
    let coeff_len = coeff.len() as i64;
    let mut adjusted = coeff_len - 1 - i64::from(value.scale);

    let mut buf = String::with_capacity(coeff.len() + 16);
    if value.signum() < 0 {
        buf.push('-');
    }

    if value.scale > 0 && adjusted >= -6 {
        let pad = i64::from(value.scale) - coeff_len;
        if pad >= 0 {
            buf.push_str("0.");
            buf.extend(core::iter::repeat_n('0', pad as usize));
            buf.push_str(&coeff);
        } else {
            let (int_part, frac_part) = coeff.split_at((-pad) as usize);
            buf.push_str(int_part);
            buf.push('.');
            buf.push_str(frac_part);
        }
        return buf;
    }

    if scientific {
        let (lead, rest) = coeff.split_at(1);
        buf.push_str(lead);
        if !rest.is_empty() {
            buf.push('.');
            buf.push_str(rest);
        }
    } else {
        // The exponent must be a multiple of three.
        let mut sig = adjusted.rem_euclid(3);
        adjusted -= sig;
        sig += 1;
        if value.signum() == 0 {
            match sig {
                1 => buf.push('0'),
                2 => {
                    buf.push_str("0.00");
                    adjusted += 3;
                }
                _ => {
                    buf.push_str("0.0");
                    adjusted += 3;
                }
            }
        } else if sig >= coeff_len {
            buf.push_str(&coeff);
            buf.extend(core::iter::repeat_n('0', (sig - coeff_len) as usize));
        } else {
            let (int_part, frac_part) = coeff.split_at(sig as usize);
            buf.push_str(int_part);
            buf.push('.');
            buf.push_str(frac_part);
        }
    }

    if adjusted != 0 {
        buf.push('E');
        if adjusted > 0 {
            buf.push('+');
        }
        buf.push_str(&adjusted.to_string());
    }
    buf
}

impl BigDecimal {
    /// Like `Display`, but any exponent is a multiple of three.
    pub fn to_engineering_string(&self) -> String {
        layout(self, false)
    }

    /// The value without an exponent.
    pub fn to_plain_string(&self) -> String {
        if self.scale == 0 {
            return self.int_val.to_string();
        }
        if self.scale < 0 {
            if self.signum() == 0 {
                return "0".to_string();
            }
            let mut buf = self.int_val.to_string();
            buf.extend(core::iter::repeat_n('0', self.scale.unsigned_abs() as usize));
            return buf;
        }

        let digits = self.int_val.magnitude_str(10);
        let scale = self.scale as usize;
        let mut buf = String::with_capacity(digits.len() + scale + 3);
        if self.signum() < 0 {
            buf.push('-');
        }
        if digits.len() > scale {
            let (int_part, frac_part) = digits.split_at(digits.len() - scale);
            buf.push_str(int_part);
            buf.push('.');
            buf.push_str(frac_part);
        } else {
            buf.push_str("0.");
            buf.extend(core::iter::repeat_n('0', scale - digits.len()));
            buf.push_str(&digits);
        }
        buf
    }
}

/// Scientific notation, as read back by `FromStr`.
impl fmt::Display for BigDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.string_cache.get_or_init(|| layout(self, true)))
    }
}
