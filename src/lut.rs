//! Waveform Look-Up Tables
//!
//! Constant tables uploaded to the controller. Nothing here is computed at
//! runtime.
//!
//! ## Layout of the v3 waveform bundle
//!
//! | Bytes     | Destination                       |
//! |-----------|-----------------------------------|
//! | 0..153    | LUT register (0x32)               |
//! | 153       | End option (0x3F)                 |
//! | 154       | Gate voltage (0x03)               |
//! | 155..158  | Source voltages (0x04)            |
//! | 158       | VCOM (0x2C)                       |
//!
//! The 70 byte mode tables are written by
//! [`Controller::configure_mode`](crate::controller::Controller::configure_mode):
//! 5 rows of 7 voltage-select bytes (BB, BW, WB, WW, VCOM) followed by 7 rows
//! of phase timings `TP[A..D], RP`.

/// Number of bytes sent to the LUT register during init
pub const WAVEFORM_LUT_SIZE: usize = 153;

/// Total size of a waveform bundle including voltage settings
pub const WAVEFORM_SIZE: usize = 159;

/// Size of the full/partial mode LUTs
pub const MODE_LUT_SIZE: usize = 70;

/// Waveform bundle for the 2.13" v3 panel (20-30°C)
#[rustfmt::skip]
pub const WAVEFORM_2IN13_V3: [u8; WAVEFORM_SIZE] = [
    // VS L0..L4
    0x80, 0x4A, 0x40, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x40, 0x4A, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x80, 0x4A, 0x40, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x40, 0x4A, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    // TP/SR/RP, groups 0..11
    0x0F, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x0F, 0x00, 0x00, 0x0F, 0x00, 0x00, 0x02,
    0x0F, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    // FR, XON
    0x22, 0x22, 0x22, 0x22, 0x22, 0x22, 0x00, 0x00, 0x00,
    // EOPT, VGH, VSH1, VSH2, VSL, VCOM
    0x22, 0x17, 0x41, 0x00, 0x32, 0x36,
];

/// LUT for full update mode
#[rustfmt::skip]
pub const LUT_FULL_UPDATE: [u8; MODE_LUT_SIZE] = [
    0x80, 0x60, 0x40, 0x00, 0x00, 0x00, 0x00, // BB
    0x10, 0x60, 0x20, 0x00, 0x00, 0x00, 0x00, // BW
    0x80, 0x60, 0x40, 0x00, 0x00, 0x00, 0x00, // WB
    0x10, 0x60, 0x20, 0x00, 0x00, 0x00, 0x00, // WW
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // VCOM

    0x03, 0x03, 0x00, 0x00, 0x02, // TP0 A-D, RP0
    0x09, 0x09, 0x00, 0x00, 0x02,
    0x03, 0x03, 0x00, 0x00, 0x02,
    0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, // TP6 A-D, RP6
];

/// LUT for partial update mode
///
/// A single short phase that only drives changed pixels (BW and WB).
#[rustfmt::skip]
pub const LUT_PARTIAL_UPDATE: [u8; MODE_LUT_SIZE] = [
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // BB
    0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // BW
    0x40, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // WB
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // WW
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // VCOM

    0x0A, 0x00, 0x00, 0x00, 0x00, // TP0 A-D, RP0
    0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, // TP6 A-D, RP6
];
