//! Black-box coverage of the OCF container reader (`C1`) boundary behaviours.

use epub_conform::ContainerError;
use epub_conform::ValidatorError;

#[test]
fn empty_file_is_rejected_as_pkg003() {
    let err = epub_conform::container::open(&[]).unwrap_err();
    assert!(matches!(err, ValidatorError::Container(ContainerError::Empty)));
    assert!(err.to_string().contains("PKG-003"));
}

#[test]
fn bad_magic_is_rejected_as_pkg004() {
    let err = epub_conform::container::open(b"this is not a zip file at all").unwrap_err();
    assert!(matches!(err, ValidatorError::Container(ContainerError::BadMagic)));
    assert!(err.to_string().contains("PKG-004"));
}
