//! # mkipk CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`: locating the
//! compiled `mkipk` binary, laying out input trees, and decoding produced
//! packages.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use flate2::read::GzDecoder;
use std::fs;
use std::io::Read;
use std::path::Path;

/// One decoded tar member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub name: String,
    pub uid: u64,
    pub gid: u64,
    pub username: String,
    pub groupname: String,
    pub mode: u32,
    pub mtime: u64,
    pub body: Vec<u8>,
}

/// # Get mkipk Command (`mkipk_cmd`)
///
/// Creates an `assert_cmd::Command` for the `mkipk` binary built for this test run.
///
/// ## Panics
/// Panics if the binary cannot be found via `Command::cargo_bin`.
pub fn mkipk_cmd() -> Command {
    Command::cargo_bin("mkipk").expect("Failed to find mkipk binary for testing")
}

/// Creates `<root>/control/control` with `control`, a `postinst` script, and a
/// small `data/` payload.
pub fn write_input_tree(root: &Path, control: &str) {
    fs::create_dir_all(root.join("control")).unwrap();
    fs::write(root.join("control/control"), control).unwrap();
    fs::write(root.join("control/postinst"), "#!/bin/sh\nexit 0\n").unwrap();
    fs::create_dir_all(root.join("data/usr/bin")).unwrap();
    fs::create_dir_all(root.join("data/etc/config")).unwrap();
    fs::write(root.join("data/usr/bin/foo"), "#!/bin/sh\necho foo\n").unwrap();
    fs::write(root.join("data/etc/config/foo"), "config foo\n").unwrap();
}

/// Decodes a `.tar.gz` buffer into its members, in archive order.
pub fn read_members(tar_gz: &[u8]) -> Vec<Member> {
    let mut archive = tar::Archive::new(GzDecoder::new(tar_gz));
    let mut members = Vec::new();
    for entry in archive.entries().expect("readable tar stream") {
        let mut entry = entry.expect("readable tar entry");
        let header = entry.header().clone();
        let name = String::from_utf8(entry.path_bytes().into_owned()).unwrap();
        let mut body = Vec::new();
        entry.read_to_end(&mut body).unwrap();
        members.push(Member {
            name,
            uid: header.uid().unwrap(),
            gid: header.gid().unwrap(),
            username: header.username().unwrap().unwrap_or_default().to_string(),
            groupname: header.groupname().unwrap().unwrap_or_default().to_string(),
            mode: header.mode().unwrap(),
            mtime: header.mtime().unwrap(),
            body,
        });
    }
    members
}

/// Reads a package file and returns its outer members.
pub fn read_package(path: &Path) -> Vec<Member> {
    read_members(&fs::read(path).expect("package file exists"))
}

/// Finds a member by name, panicking with the available names otherwise.
pub fn member<'a>(members: &'a [Member], name: &str) -> &'a Member {
    members.iter().find(|m| m.name == name).unwrap_or_else(|| {
        panic!(
            "member '{}' not found in {:?}",
            name,
            members.iter().map(|m| &m.name).collect::<Vec<_>>()
        )
    })
}
