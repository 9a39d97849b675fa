/// 128-bit content fingerprint built from two differently-seeded FNV-1a 64
/// streams over the same bytes.
///
/// A 32-bit rolling hash would be cheap but collision-prone as the shader
/// set grows; two independent 64-bit streams make an accidental collision
/// implausible at any realistic shader vocabulary size.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Fingerprint {
    pub hi: u64,
    pub lo: u64,
}

const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;
const SEED_HI: u64 = 0xcbf2_9ce4_8422_2325;
const SEED_LO: u64 = 0x9ae1_6a3b_2f90_404f;

impl Fingerprint {
    pub fn of(bytes: &[u8]) -> Self {
        let mut hi = SEED_HI;
        let mut lo = SEED_LO;
        for &b in bytes {
            hi = (hi ^ u64::from(b)).wrapping_mul(FNV_PRIME);
            lo = (lo ^ u64::from(b)).wrapping_mul(FNV_PRIME);
        }
        Self { hi, lo }
    }

    pub fn of_str(s: &str) -> Self {
        Self::of(s.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_sources_share_a_fingerprint() {
        let a = Fingerprint::of_str("fn vs_main() {}");
        let b = Fingerprint::of_str("fn vs_main() {}");
        assert_eq!(a, b);
    }

    #[test]
    fn different_sources_diverge() {
        let a = Fingerprint::of_str("fn vs_main() {}");
        let b = Fingerprint::of_str("fn fs_main() {}");
        assert_ne!(a, b);
    }

    #[test]
    fn single_byte_change_diverges() {
        let a = Fingerprint::of_str("let x = 1.0;");
        let b = Fingerprint::of_str("let x = 1.1;");
        assert_ne!(a, b);
    }

    #[test]
    fn streams_are_independent() {
        // If both streams collapsed to the same function the key would be
        // 64-bit in disguise.
        let f = Fingerprint::of_str("some shader text");
        assert_ne!(f.hi, f.lo);
    }

    #[test]
    fn empty_source_is_the_seed_pair() {
        let f = Fingerprint::of(&[]);
        assert_eq!(f.hi, SEED_HI);
        assert_eq!(f.lo, SEED_LO);
    }
}
