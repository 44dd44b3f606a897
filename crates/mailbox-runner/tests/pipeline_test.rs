//! Replay tests: byte stream → lines → monitor → notifier.

use std::io::{self, Cursor, Read};
use std::sync::atomic::AtomicBool;

use crossbeam_channel::Sender;
use mailbox_core::{MailboxMonitor, MonitorConfig, NotificationDispatcher, Notifier, NotifyError};
use mailbox_runner::{process_source, ReaderLineSource, RunSummary, SourceError};
use twelite_pal::{DataEntry, SensorFrame};

struct ChannelNotifier(Sender<String>);

impl Notifier for ChannelNotifier {
    fn send(&self, message: &str, _recipient: &str) -> Result<(), NotifyError> {
        let _ = self.0.send(message.to_string());
        Ok(())
    }
}

/// Reader handing out the stream in fixed-size chunks, like a UART.
struct Chunked {
    data: Vec<u8>,
    pos: usize,
    chunk: usize,
}

impl Read for Chunked {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.chunk.min(buf.len()).min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

fn mag_line(sequence: u16, state: u8) -> String {
    SensorFrame {
        relay_serial_id: 0x8000_0000,
        link_quality: 0xA0,
        sequence_number: sequence,
        sender_serial_id: 0x8201_0203,
        sender_logical_device_id: 0x01,
        sensor_type: 0x80,
        pal_version: 0x81,
        entries: vec![
            DataEntry {
                data_size: 0x11,
                data_source: 0x30,
                data_type: 0x08,
                data_length: 2,
                data_value: 3000,
            },
            DataEntry {
                data_size: 0x11,
                data_source: 0x30,
                data_type: 0x01,
                data_length: 2,
                data_value: 0x0200,
            },
            DataEntry {
                data_size: 0x00,
                data_source: 0x00,
                data_type: 0x00,
                data_length: 1,
                data_value: u16::from(state),
            },
        ],
        checksum1: 0x17,
        checksum2: 0,
        checksum_valid: false,
    }
    .with_lrc()
    .encode()
}

fn replay(stream: Vec<u8>, chunk: usize) -> (RunSummary, Vec<String>) {
    let (tx, rx) = crossbeam_channel::unbounded();
    let dispatcher = NotificationDispatcher::spawn(ChannelNotifier(tx)).unwrap();
    let monitor = MailboxMonitor::new(MonitorConfig::new("U1"), dispatcher);

    let mut source = ReaderLineSource::new(Chunked {
        data: stream,
        pos: 0,
        chunk,
    });
    let stop = AtomicBool::new(false);
    let summary = process_source(&monitor, &mut source, &stop).unwrap();

    monitor.shutdown();
    (summary, rx.try_iter().collect())
}

#[test]
fn test_replay_mail_cycle() {
    let mut stream = String::new();
    // flap opened to 1, closed back to 0 twice, with a repeat and some noise
    for (seq, state) in [(1, 0), (2, 1), (3, 1), (4, 0), (5, 0), (6, 1), (7, 0)] {
        stream.push_str(&mag_line(seq, state));
        stream.push_str("\r\n");
    }
    stream.push_str("!INF TWELITE gateway\r\n");

    for chunk in [1, 5, 64, 4096] {
        let (summary, sent) = replay(stream.clone().into_bytes(), chunk);
        assert_eq!(summary.lines, 8, "chunk {}", chunk);
        assert_eq!(summary.observed, 7);
        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.notifications, 2);
        assert_eq!(sent, vec!["Incoming mail".to_string(); 2]);
    }
}

#[test]
fn test_stop_flag_ends_run() {
    let (tx, _rx) = crossbeam_channel::unbounded();
    let dispatcher = NotificationDispatcher::spawn(ChannelNotifier(tx)).unwrap();
    let monitor = MailboxMonitor::new(MonitorConfig::new("U1"), dispatcher);

    let mut source = ReaderLineSource::new(Cursor::new(format!("{}\r\n", mag_line(1, 2))));
    let stop = AtomicBool::new(true);
    let summary = process_source(&monitor, &mut source, &stop).unwrap();

    assert_eq!(summary, RunSummary::default());
    assert_eq!(monitor.current_status(), 0);
    monitor.shutdown();
}

#[test]
fn test_read_error_surfaces() {
    struct Unplugged;
    impl Read for Unplugged {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "device unplugged"))
        }
    }

    let (tx, _rx) = crossbeam_channel::unbounded();
    let dispatcher = NotificationDispatcher::spawn(ChannelNotifier(tx)).unwrap();
    let monitor = MailboxMonitor::new(MonitorConfig::new("U1"), dispatcher);

    let mut source = ReaderLineSource::new(Unplugged);
    let stop = AtomicBool::new(false);
    assert!(matches!(
        process_source(&monitor, &mut source, &stop),
        Err(SourceError::Io(_))
    ));
    monitor.shutdown();
}
