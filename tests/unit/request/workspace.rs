use super::*;

#[test]
fn create_makes_three_directories_under_base() {
    let base = tempfile::tempdir().unwrap();
    let ws = Workspace::create(base.path()).unwrap();

    assert!(ws.root().starts_with(base.path()));
    assert!(ws.input_dir().is_dir());
    assert!(ws.frame_dir().is_dir());
    assert!(ws.output_dir().is_dir());
    assert_ne!(ws.input_dir(), ws.frame_dir());
}

#[test]
fn drop_removes_everything() {
    let base = tempfile::tempdir().unwrap();
    let (input, frames, output) = {
        let ws = Workspace::create(base.path()).unwrap();
        ws.stage_input("a.png", b"data").unwrap();
        std::fs::write(ws.frame_dir().join("0001.png"), b"f").unwrap();
        (
            ws.input_dir().to_path_buf(),
            ws.frame_dir().to_path_buf(),
            ws.output_dir().to_path_buf(),
        )
    };

    assert!(!input.exists());
    assert!(!frames.exists());
    assert!(!output.exists());
    assert_eq!(std::fs::read_dir(base.path()).unwrap().count(), 0);
}

#[test]
fn close_removes_everything() {
    let base = tempfile::tempdir().unwrap();
    let ws = Workspace::create(base.path()).unwrap();
    let root = ws.root().to_path_buf();
    ws.close().unwrap();
    assert!(!root.exists());
}

#[test]
fn stage_input_keeps_only_the_file_name() {
    let base = tempfile::tempdir().unwrap();
    let ws = Workspace::create(base.path()).unwrap();

    let staged = ws.stage_input("../../escape/cat.png", b"bytes").unwrap();
    assert_eq!(staged, ws.input_dir().join("cat.png"));
    assert_eq!(std::fs::read(&staged).unwrap(), b"bytes");

    assert!(ws.stage_input("..", b"x").is_err());
}

#[test]
fn workspaces_do_not_collide() {
    let base = tempfile::tempdir().unwrap();
    let a = Workspace::create(base.path()).unwrap();
    let b = Workspace::create(base.path()).unwrap();
    assert_ne!(a.root(), b.root());
}
