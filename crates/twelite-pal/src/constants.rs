//! Protocol constants for PAL gateway lines.

/// First character of every data line.
pub const LINE_PREFIX: u8 = b':';

/// Hex digits in the fixed header after the prefix, including the entry count.
pub const HEADER_DIGITS: usize = 30;

/// Hex digits in the fixed part of an entry (info, source, type, length).
pub const ENTRY_HEADER_DIGITS: usize = 8;

/// Hex digits of `checksum2`, which always closes the line.
pub const CHECKSUM2_DIGITS: usize = 2;

/// Fewest hex digits an entry can occupy (a one-byte value).
pub const MIN_ENTRY_DIGITS: usize = ENTRY_HEADER_DIGITS + 2;

/// Fewest hex digits the trailer can occupy (a one-byte `checksum1`).
pub const MIN_TRAILER_DIGITS: usize = 2 + CHECKSUM2_DIGITS;

// ============================================================================
// Data Sources
// ============================================================================

/// Magnetic (reed switch / hall IC) sensor.
pub const DATA_SOURCE_MAGNETIC: u8 = 0x00;
/// Analog-to-digital converter.
pub const DATA_SOURCE_ADC: u8 = 0x30;

// ============================================================================
// Data Types (extension byte)
// ============================================================================

/// Magnet state under [`DATA_SOURCE_MAGNETIC`].
pub const DATA_TYPE_MAGNET_STATE: u8 = 0x00;
/// ADC1 channel under [`DATA_SOURCE_ADC`].
pub const DATA_TYPE_ADC1: u8 = 0x01;
/// Supply voltage under [`DATA_SOURCE_ADC`].
pub const DATA_TYPE_SUPPLY_VOLTAGE: u8 = 0x08;

/// Mask selecting the magnet state from a magnetic entry's value.
///
/// The upper bits carry flags (bit 7 marks a periodic transmission).
pub const MAGNET_STATE_MASK: u16 = 0x0F;
