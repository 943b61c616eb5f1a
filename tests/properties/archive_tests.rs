use proptest::prelude::*;

use skillpack::archive::{FileEntry, pack, unpack};

fn arb_entry() -> impl Strategy<Value = FileEntry> {
    let path = prop::collection::vec("[a-z0-9_]{1,12}", 1..4).prop_map(|segments| segments.join("/"));
    let ext = prop_oneof![
        Just("md"),
        Just("py"),
        Just("json"),
        Just("png"),
        Just("bin"),
        Just("txt"),
    ];
    let bytes = prop::collection::vec(any::<u8>(), 0..2048);
    (path, ext, bytes).prop_map(|(path, ext, bytes)| FileEntry::bytes(format!("{path}.{ext}"), bytes))
}

fn arb_file_set() -> impl Strategy<Value = Vec<FileEntry>> {
    prop::collection::vec(arb_entry(), 0..12).prop_map(|mut files| {
        let mut seen = std::collections::HashSet::new();
        files.retain(|file| seen.insert(file.path.clone()));
        files
    })
}

proptest! {
    #[test]
    fn unpack_preserves_order_and_bytes(files in arb_file_set()) {
        let archive = pack(&files).unwrap();
        let back = unpack(&archive).unwrap();

        prop_assert_eq!(back.len(), files.len());
        for (original, decoded) in files.iter().zip(&back) {
            prop_assert_eq!(&original.path, &decoded.path);
            prop_assert_eq!(original.content.as_bytes(), decoded.content.as_bytes());
        }
    }

    #[test]
    fn pack_is_deterministic(files in arb_file_set()) {
        prop_assert_eq!(pack(&files).unwrap(), pack(&files).unwrap());
    }

    #[test]
    fn unpack_never_panics_on_noise(bytes in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = unpack(&bytes);
    }
}
