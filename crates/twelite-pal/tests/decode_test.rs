//! Decoding tests over whole gateway lines.

use twelite_pal::{decode, magnetic_status, DataEntry, DecodeError, EntryKind, LineCodec, SensorFrame};

fn frame_with(entries: Vec<DataEntry>) -> SensorFrame {
    SensorFrame {
        relay_serial_id: 0x8100_1234,
        link_quality: 0x01,
        sequence_number: 0x0001,
        sender_serial_id: 0xA2B3_C4D5,
        sender_logical_device_id: 0x01,
        sensor_type: 0x80,
        pal_version: 0x81,
        entries,
        checksum1: 0x3C,
        checksum2: 0,
        checksum_valid: false,
    }
    .with_lrc()
}

fn magnet(value: u8) -> DataEntry {
    DataEntry {
        data_size: 0x00,
        data_source: 0x00,
        data_type: 0x00,
        data_length: 1,
        data_value: u16::from(value),
    }
}

fn supply_voltage(millivolts: u16) -> DataEntry {
    DataEntry {
        data_size: 0x11,
        data_source: 0x30,
        data_type: 0x08,
        data_length: 2,
        data_value: millivolts,
    }
}

fn adc1(raw: u16) -> DataEntry {
    DataEntry {
        data_size: 0x11,
        data_source: 0x30,
        data_type: 0x01,
        data_length: 2,
        data_value: raw,
    }
}

/// The layout the open/close sensor PAL sends: supply voltage, ADC1, magnet.
fn mag_pal_entries(state: u8) -> Vec<DataEntry> {
    vec![supply_voltage(3300), adc1(0x0400), magnet(state)]
}

#[test]
fn test_entry_count_drives_parsing() {
    let counts: [usize; 6] = [0, 1, 2, 3, 7, 40];
    for n in counts {
        let entries: Vec<DataEntry> = (0..n)
            .map(|i| {
                if i % 2 == 0 {
                    adc1(i as u16 * 101)
                } else {
                    magnet((i % 16) as u8)
                }
            })
            .collect();
        let expected = frame_with(entries);
        let decoded = decode(&expected.encode()).unwrap();

        assert_eq!(decoded.entries.len(), n, "entry count {}", n);
        assert_eq!(decoded, expected);
    }
}

#[test]
fn test_mag_pal_line_decodes() {
    let line = frame_with(mag_pal_entries(0x00)).encode();
    let frame = SensorFrame::decode(&line).unwrap();

    assert_eq!(frame.entries.len(), 3);
    assert_eq!(frame.entries[0].kind(), EntryKind::SupplyVoltage);
    assert_eq!(frame.entries[0].data_value, 3300);
    assert_eq!(frame.entries[1].kind(), EntryKind::Adc1);
    assert_eq!(frame.entries[2].kind(), EntryKind::Magnetic);
    assert_eq!(magnetic_status(&frame), Some(0x00));
    assert!(frame.checksum_valid);
}

#[test]
fn test_entry_count_beyond_line_is_truncated() {
    let mut line = frame_with(vec![magnet(1)]).encode();
    // bump the declared entry count (digits 29..31) from 01 to 03
    line.replace_range(29..31, "03");

    assert_eq!(
        decode(&line),
        Err(DecodeError::TruncatedEntry { index: 0, declared: 3 })
    );
}

#[test]
fn test_wide_checksum_is_not_read_as_an_entry() {
    // an 8-digit checksum1 leaves exactly 10 digits, the size of a short entry
    for (checksum1, count) in [(0xDEAD_BEEF, "02"), (0x0101_0101, "02"), (0x5A, "02")] {
        let mut frame = frame_with(vec![magnet(1)]);
        frame.checksum1 = checksum1;
        let mut line = frame.with_lrc().encode();
        line.replace_range(29..31, count);

        assert_eq!(
            decode(&line),
            Err(DecodeError::TruncatedEntry { index: 0, declared: 2 }),
            "checksum1 {:#X}",
            checksum1
        );
    }
}

#[test]
fn test_truncated_value_field() {
    let line = frame_with(vec![supply_voltage(3000)]).encode();
    // header(31) + entry header(8) + two of the four value digits
    let cut = &line[..31 + 8 + 2];
    assert_eq!(
        decode(cut),
        Err(DecodeError::TruncatedEntry { index: 0, declared: 1 })
    );
}

#[test]
fn test_non_hex_inside_entry() {
    let mut line = frame_with(mag_pal_entries(1)).encode();
    line.replace_range(33..34, "z");
    match decode(&line) {
        Err(DecodeError::Malformed { offset, reason }) => {
            assert_eq!(offset, 33);
            assert!(reason.contains("data source"), "{}", reason);
        }
        other => panic!("expected Malformed, got {:?}", other),
    }
}

#[test]
fn test_wrong_checksum_tail_is_malformed() {
    let mut frame = frame_with(vec![magnet(1)]);
    frame.checksum1 = 0x1234;
    let line = frame.with_lrc().encode();
    // five trailing digits match no checksum layout
    let short = &line[..line.len() - 1];
    assert!(matches!(decode(short), Err(DecodeError::Malformed { .. })));
}

#[test]
fn test_codec_to_decoder() {
    let a = frame_with(mag_pal_entries(3)).encode();
    let b = frame_with(mag_pal_entries(0)).encode();
    let stream = format!("{a}\r\n{b}\r\nnoise\r\n");

    let mut codec = LineCodec::new();
    let mut statuses = Vec::new();
    let mut rejected = 0;
    for chunk in stream.as_bytes().chunks(7) {
        codec.push(chunk);
        while let Some(line) = codec.decode_line() {
            match decode(&line) {
                Ok(frame) => statuses.push(frame.magnetic_status()),
                Err(_) => rejected += 1,
            }
        }
    }

    assert_eq!(statuses, vec![Some(3), Some(0)]);
    assert_eq!(rejected, 1);
}
