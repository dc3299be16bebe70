//! Checksums used by sensor protocols
//!
//! Thin wrappers over the `crc` crate catalog so drivers name the protocol,
//! not the polynomial.

use ::crc::{CRC_8_NRSC_5, CRC_16_MODBUS, Crc};

/// CRC-16/MODBUS: poly 0x8005 reflected, init 0xFFFF
const MODBUS: Crc<u16> = Crc::<u16>::new(&CRC_16_MODBUS);

/// CRC-8 with poly 0x31 and init 0xFF, as used by Aosong and Sensirion parts
const POLY_31: Crc<u8> = Crc::<u8>::new(&CRC_8_NRSC_5);

/// CRC-16/MODBUS of `data`
///
/// The checksum goes on the wire low byte first.
pub fn crc16_modbus(data: &[u8]) -> u16 {
    MODBUS.checksum(data)
}

/// True if the last two bytes of `frame` are the little-endian
/// CRC-16/MODBUS of the rest
pub fn check_crc16_modbus(frame: &[u8]) -> bool {
    match frame.len().checked_sub(2) {
        Some(split) => {
            let (payload, crc) = frame.split_at(split);
            crc16_modbus(payload) == u16::from_le_bytes([crc[0], crc[1]])
        }
        None => false,
    }
}

/// CRC-8 (poly 0x31, init 0xFF) of `data`
pub fn crc8(data: &[u8]) -> u8 {
    POLY_31.checksum(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    const AM2320_FRAME: [u8; 8] = [0x03, 0x04, 0x01, 0xF4, 0x00, 0xFA, 0x31, 0xA5];

    #[test]
    fn test_modbus_vector() {
        assert_eq!(crc16_modbus(&AM2320_FRAME[..6]), 0xA531);
        assert!(check_crc16_modbus(&AM2320_FRAME));
    }

    #[test]
    fn test_modbus_single_bit_flips_fail() {
        for byte in 0..6 {
            for bit in 0..8 {
                let mut frame = AM2320_FRAME;
                frame[byte] ^= 1 << bit;
                assert!(
                    !check_crc16_modbus(&frame),
                    "flip of bit {bit} in byte {byte} passed"
                );
            }
        }
    }

    #[test]
    fn test_modbus_short_frame() {
        assert!(!check_crc16_modbus(&[0x31]));
        // Empty payload: init value, 0xFFFF
        assert!(check_crc16_modbus(&[0xFF, 0xFF]));
    }

    #[test]
    fn test_crc8_vectors() {
        // Catalog check value
        assert_eq!(crc8(b"123456789"), 0xF7);
        assert_eq!(crc8(&[0xBE, 0xEF]), 0x92);
        assert_eq!(crc8(&[0x1C, 0x80, 0x00, 0x05, 0x66, 0x66]), 0x96);
    }
}
