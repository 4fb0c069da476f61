use std::path::PathBuf;

use aprs::ax25::Address;

pub fn fixture_path(name: &str) -> PathBuf {
    let mut path =
        PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR not set"));
    path.push("tests/fixtures");
    path.push(name);
    path
}

/// Raw UI frame from `src` to `dst` via `digis` carrying `info`.
pub fn ui_frame(src: &Address, dst: &Address, digis: &[Address], info: &[u8]) -> Vec<u8> {
    let mut addrs = vec![dst.encode(), src.encode()];
    addrs.extend(digis.iter().map(Address::encode));

    let mut dat = Vec::new();
    let last = addrs.len() - 1;
    for (idx, mut block) in addrs.into_iter().enumerate() {
        if idx != last {
            block[6] &= !0x01;
        }
        dat.extend_from_slice(&block);
    }
    dat.extend_from_slice(&[0x03, 0xf0]);
    dat.extend_from_slice(info);
    dat
}
