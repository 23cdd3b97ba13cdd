//! NTSC colour palette.
//!
//! A colour register holds a 4-bit hue in bits 7-4 and a 3-bit luminance in
//! bits 3-1. Bit 0 is ignored, so the palette has 128 entries indexed by
//! `colour >> 1`.

/// `0xRR_GG_BB`, one row of eight luminances per hue.
#[rustfmt::skip]
pub const PALETTE: [u32; 128] = [
    0x00_00_00, 0x40_40_40, 0x6C_6C_6C, 0x90_90_90, 0xB0_B0_B0, 0xC8_C8_C8, 0xDC_DC_DC, 0xEC_EC_EC,
    0x44_44_00, 0x64_64_10, 0x84_84_24, 0xA0_A0_34, 0xB8_B8_40, 0xD0_D0_50, 0xE8_E8_5C, 0xFC_FC_68,
    0x70_28_00, 0x84_44_14, 0x98_5C_28, 0xAC_78_3C, 0xBC_8C_4C, 0xCC_A0_5C, 0xDC_B4_68, 0xEC_C8_78,
    0x84_18_00, 0x98_34_18, 0xAC_50_30, 0xC0_68_48, 0xD0_80_5C, 0xE0_94_70, 0xEC_A8_80, 0xFC_BC_94,
    0x88_00_00, 0x9C_20_20, 0xB0_3C_3C, 0xC0_58_58, 0xD0_70_70, 0xE0_88_88, 0xEC_A0_A0, 0xFC_B4_B4,
    0x78_00_5C, 0x8C_20_74, 0xA0_3C_88, 0xB0_58_9C, 0xC0_70_B0, 0xD0_84_C0, 0xDC_9C_D0, 0xEC_B0_E0,
    0x48_00_78, 0x60_20_90, 0x78_3C_A4, 0x8C_58_B8, 0xA0_70_CC, 0xB4_84_DC, 0xC4_9C_EC, 0xD4_B0_FC,
    0x14_00_84, 0x30_20_98, 0x4C_3C_AC, 0x68_58_C0, 0x7C_70_D0, 0x94_88_E0, 0xA8_A0_EC, 0xBC_B4_FC,
    0x00_00_88, 0x1C_20_9C, 0x38_40_B0, 0x50_5C_C0, 0x68_74_D0, 0x7C_8C_E0, 0x90_A4_EC, 0xA4_B8_FC,
    0x00_18_7C, 0x1C_38_90, 0x38_54_A8, 0x50_70_BC, 0x68_88_CC, 0x7C_9C_DC, 0x90_B4_EC, 0xA4_C8_FC,
    0x00_2C_5C, 0x1C_4C_78, 0x38_68_90, 0x50_84_AC, 0x68_9C_C0, 0x7C_B4_D4, 0x90_CC_E8, 0xA4_E0_FC,
    0x00_3C_2C, 0x1C_5C_48, 0x38_7C_64, 0x50_9C_80, 0x68_B4_94, 0x7C_D0_AC, 0x90_E4_C0, 0xA4_FC_D4,
    0x00_3C_00, 0x20_5C_20, 0x40_7C_40, 0x5C_9C_5C, 0x74_B4_74, 0x8C_D0_8C, 0xA4_E4_A4, 0xB8_FC_B8,
    0x14_38_00, 0x34_5C_1C, 0x50_7C_38, 0x6C_98_50, 0x84_B4_68, 0x9C_CC_7C, 0xB4_E4_90, 0xC8_FC_A4,
    0x2C_30_00, 0x4C_50_1C, 0x68_70_34, 0x84_8C_4C, 0x9C_A8_64, 0xB4_C0_78, 0xCC_D4_88, 0xE0_EC_9C,
    0x44_28_00, 0x64_48_18, 0x84_68_30, 0xA0_84_44, 0xB8_9C_58, 0xD0_B4_6C, 0xE8_CC_7C, 0xFC_E0_8C,
];

/// RGB triple for a colour register value.
#[must_use]
pub const fn rgb(colour: u8) -> [u8; 3] {
    let c = PALETTE[(colour >> 1) as usize];
    [(c >> 16) as u8, (c >> 8) as u8, c as u8]
}
