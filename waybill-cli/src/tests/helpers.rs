//! Test helpers for staging solve requests on disk.

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;
use waybill_core::SolveRequest;
use waybill_core::test_support::two_job_request;

/// Write `contents` to `path`, panicking with context on failure.
pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path, contents).unwrap_or_else(|err| panic!("write {path}: {err}"));
}

/// Temporary directory holding a request file.
pub(super) struct RequestDir {
    _tmp: TempDir,
    pub(super) root: Utf8PathBuf,
    pub(super) request_path: Utf8PathBuf,
}

impl RequestDir {
    pub(super) fn new() -> Self {
        let tmp = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
        let request_path = root.join("request.json");
        Self {
            _tmp: tmp,
            root,
            request_path,
        }
    }

    pub(super) fn write_request(&self, request: &SolveRequest) {
        let payload = serde_json::to_string_pretty(request).expect("serialise request");
        write_utf8(&self.request_path, payload.as_bytes());
    }

    /// Stage the two-job line whose best plan takes 7 time units.
    pub(super) fn write_two_job_request(&self) {
        self.write_request(&two_job_request());
    }
}
