//! Interpretation of data entries.

use crate::constants::{
    DATA_SOURCE_ADC, DATA_SOURCE_MAGNETIC, DATA_TYPE_ADC1, DATA_TYPE_MAGNET_STATE,
    DATA_TYPE_SUPPLY_VOLTAGE, MAGNET_STATE_MASK,
};
use crate::frame::{DataEntry, SensorFrame};

/// What a data entry measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// State of the magnetic sensor.
    Magnetic,
    /// Raw ADC1 channel reading.
    Adc1,
    /// Supply voltage reading.
    SupplyVoltage,
    /// A source/type pair this crate does not act on.
    Unknown {
        /// Data source byte.
        source: u8,
        /// Data type byte.
        data_type: u8,
    },
}

impl DataEntry {
    /// Classify this entry by its source and type bytes.
    pub fn kind(&self) -> EntryKind {
        match (self.data_source, self.data_type) {
            (DATA_SOURCE_MAGNETIC, DATA_TYPE_MAGNET_STATE) => EntryKind::Magnetic,
            (DATA_SOURCE_ADC, DATA_TYPE_ADC1) => EntryKind::Adc1,
            (DATA_SOURCE_ADC, DATA_TYPE_SUPPLY_VOLTAGE) => EntryKind::SupplyVoltage,
            (source, data_type) => EntryKind::Unknown { source, data_type },
        }
    }

    /// The 4-bit magnet state, if this is a magnetic entry.
    pub fn magnet_state(&self) -> Option<u8> {
        match self.kind() {
            EntryKind::Magnetic => Some((self.data_value & MAGNET_STATE_MASK) as u8),
            _ => None,
        }
    }
}

impl SensorFrame {
    /// See [`magnetic_status`].
    pub fn magnetic_status(&self) -> Option<u8> {
        magnetic_status(self)
    }
}

/// Extract the magnetic sensor status from a frame.
///
/// Returns the low 4 bits of the first magnetic entry's value, or `None`
/// when the frame carries no magnetic entry. ADC and unknown entries are
/// skipped.
pub fn magnetic_status(frame: &SensorFrame) -> Option<u8> {
    frame.entries.iter().find_map(DataEntry::magnet_state)
}
