use crate::domain::{FrameError, Operation, frame};
use serde_json::json;

#[test]
fn roundtrip_all_operations() {
    let payload = json!({ "path": "/home/user", "depth": 3 });
    for operation in Operation::all() {
        let encoded = frame::encode(operation, &payload);
        assert_eq!(encoded[0], operation.as_byte());

        let decoded = frame::decode(&encoded).unwrap();
        assert_eq!(decoded.operation, operation);
        assert_eq!(decoded.payload, Some(payload.clone()));
    }
}

#[test]
fn roundtrip_empty_object() {
    let encoded = frame::encode(Operation::ListFiles, &json!({}));
    let decoded = frame::decode(&encoded).unwrap();
    assert_eq!(decoded.operation, Operation::ListFiles);
    assert_eq!(decoded.payload, Some(json!({})));
}

#[test]
fn bare_opcode_decodes_without_payload() {
    let decoded = frame::decode(&[Operation::CreateFolder.as_byte()]).unwrap();
    assert_eq!(decoded.operation, Operation::CreateFolder);
    assert_eq!(decoded.payload, None);
}

#[test]
fn unparsable_body_degrades_to_no_payload() {
    let mut bytes = vec![Operation::Error.as_byte()];
    bytes.extend_from_slice(b"{not json");
    let decoded = frame::decode(&bytes).unwrap();
    assert_eq!(decoded.operation, Operation::Error);
    assert_eq!(decoded.payload, None);
}

#[test]
fn empty_frame_is_rejected() {
    assert_eq!(frame::decode(&[]), Err(FrameError::Empty));
}

#[test]
fn retired_opcodes_are_unknown() {
    assert_eq!(frame::decode(&[0x02]), Err(FrameError::UnknownOpcode(0x02)));
    assert_eq!(frame::decode(&[0x03]), Err(FrameError::UnknownOpcode(0x03)));
    assert_eq!(frame::decode(&[0x7F]), Err(FrameError::UnknownOpcode(0x7F)));
}

#[test]
fn opcode_values_match_the_wire() {
    assert_eq!(Operation::Ready.as_byte(), 0x00);
    assert_eq!(Operation::ListFiles.as_byte(), 0x01);
    assert_eq!(Operation::CreateFile.as_byte(), 0x04);
    assert_eq!(Operation::Error.as_byte(), 0x09);
    assert_eq!(Operation::ResolveSymlink.as_byte(), 0x0B);
    assert_eq!(Operation::Chmod.as_byte(), 0x0E);
    assert_eq!(Operation::FolderSize.as_byte(), 0x11);
    assert_eq!(Operation::from_byte(0x10), Some(Operation::Checksum));
    assert_eq!(Operation::from_byte(0x12), None);
}
