//! Per-mode reward tokens appended to the `win` line.
//!
//! The tokens are stored XOR-masked with a short repeating key so they do not
//! show up in a plain `strings` dump of the binary. The mask is not a secret.

use shared::Mode;

const MASK_KEY: &[u8] = b"paddle";

const FAST_REWARD: [u8; 35] = [
    0x33, 0x35, 0x22, 0x1f, 0x1e, 0x51, 0x00, 0x50, 0x00, 0x3b, 0x1e, 0x56, 0x16, 0x0d, 0x57,
    0x1c, 0x5f, 0x16, 0x2f, 0x51, 0x0a, 0x3b, 0x58, 0x3a, 0x04, 0x50, 0x0a, 0x1d, 0x33, 0x07,
    0x40, 0x55, 0x16, 0x00, 0x11,
];

const DOUBLE_REWARD: [u8; 34] = [
    0x33, 0x35, 0x22, 0x1f, 0x18, 0x12, 0x41, 0x02, 0x57, 0x3b, 0x18, 0x0d, 0x43, 0x3e, 0x06,
    0x50, 0x00, 0x09, 0x03, 0x3e, 0x10, 0x13, 0x5d, 0x06, 0x43, 0x3e, 0x10, 0x0c, 0x5f, 0x3a,
    0x16, 0x14, 0x0a, 0x19,
];

fn unmask(masked: &[u8]) -> String {
    masked
        .iter()
        .zip(MASK_KEY.iter().cycle())
        .map(|(byte, key)| (byte ^ key) as char)
        .collect()
}

/// Token sent after `win` for `mode`, if that mode has one.
pub fn reward_token(mode: Mode) -> Option<String> {
    match mode {
        Mode::Default => None,
        Mode::Fast => Some(unmask(&FAST_REWARD)),
        Mode::Double => Some(unmask(&DOUBLE_REWARD)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mode_has_no_reward() {
        assert_eq!(reward_token(Mode::Default), None);
    }

    #[test]
    fn test_fast_reward() {
        assert_eq!(
            reward_token(Mode::Fast).as_deref(),
            Some("CTF{r4p1d_r3fl3x3s_0n_4_t1ny_b04rd}")
        );
    }

    #[test]
    fn test_double_reward() {
        assert_eq!(
            reward_token(Mode::Double).as_deref(),
            Some("CTF{tw1c3_th3_b4lls_tw1c3_th3_fun}")
        );
    }

    #[test]
    fn test_rewards_are_printable_single_words() {
        for mode in [Mode::Fast, Mode::Double] {
            let token = reward_token(mode).unwrap();
            assert!(token.chars().all(|c| c.is_ascii_graphic()), "{token:?}");
        }
    }
}
