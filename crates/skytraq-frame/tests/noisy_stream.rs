use std::io::Cursor;

use skytraq_frame::{FrameError, FrameReader, FrameWriter, MessageId, PREAMBLE};

/// Frames written back to back with line noise between them, the way a
/// receiver's output looks when the host attaches mid-stream.
fn noisy_capture() -> (Vec<u8>, Vec<(MessageId, Vec<u8>)>) {
    let ephemeris: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
    let sent = vec![
        (MessageId::NAV_DATA, vec![0x02; 58]),
        (MessageId::ACK, vec![0x02]),
        (MessageId::SOFTWARE_CRC, vec![0x01, 0xBE, 0xEF]),
        (MessageId::EPHEMERIS_DATA, ephemeris),
        (MessageId::POWER_MODE, vec![]),
    ];
    let noise: [&[u8]; 5] = [
        &[0x0A, 0x0D],
        &[PREAMBLE[0]],
        &[PREAMBLE[0], PREAMBLE[0], 0x42],
        &[PREAMBLE[1], PREAMBLE[0], 0x00, 0x00],
        &[],
    ];

    let mut bytes = Vec::new();
    for ((id, payload), junk) in sent.iter().zip(noise) {
        bytes.extend_from_slice(junk);
        let mut writer = FrameWriter::new(&mut bytes);
        writer.send(*id, payload).expect("frame should encode");
    }
    (bytes, sent)
}

#[test]
fn every_frame_survives_noise() {
    let (bytes, sent) = noisy_capture();
    let mut reader = FrameReader::new(Cursor::new(bytes));

    let mut received = Vec::new();
    loop {
        match reader.read_frame() {
            Ok(frame) => received.push((frame.id, frame.payload.to_vec())),
            Err(FrameError::ConnectionClosed) => break,
            Err(err) => panic!("unexpected error: {err}"),
        }
    }

    assert_eq!(received, sent);
}

#[test]
fn corrupted_frame_is_skipped_by_decoding_again() {
    let (mut bytes, sent) = noisy_capture();
    // Flip one payload byte of the first frame (after 2 noise bytes and the header).
    bytes[2 + 4 + 1 + 10] ^= 0x40;

    let mut reader = FrameReader::new(Cursor::new(bytes));
    assert!(matches!(
        reader.read_frame(),
        Err(FrameError::ChecksumMismatch { .. })
    ));

    let next = reader.read_frame().expect("decoder resynchronizes");
    assert_eq!((next.id, next.payload.to_vec()), sent[1]);
}
