mod common;

use std::{fs, path::Path};

use tempfile::tempdir;
use yt_stems::{
    core::separate::{separate, Demucs},
    DemucsSettings, StemsError,
};

#[cfg(unix)]
#[test]
fn creates_stem_dir_and_passes_it_with_audio_path() {
    let tmp = tempdir().unwrap();
    let args_file = tmp.path().join("args.txt");
    let tool = common::sh_tool(
        tmp.path(),
        "demucs.sh",
        &format!(r#"printf '%s\n' "$@" > '{}'"#, args_file.display()),
    );
    let audio = tmp.path().join("audio.mp3");
    fs::write(&audio, b"ID3").unwrap();
    let stems_root = tmp.path().join("nested").join("stems_");

    let demucs = Demucs::new(DemucsSettings {
        command: tool,
        ..DemucsSettings::default()
    });
    let out_dir = separate(&demucs, &audio, &stems_root, "m9jMKheN0iU").expect("separate failed");

    assert_eq!(out_dir, stems_root.join("m9jMKheN0iU"));
    assert!(out_dir.is_dir());
    assert!(out_dir.ends_with(Path::new("stems_/m9jMKheN0iU")));

    let args = common::recorded_args(&args_file);
    assert_eq!(
        args,
        [
            format!("--out={}", out_dir.display()),
            audio.display().to_string()
        ]
    );
}

#[cfg(unix)]
#[test]
fn non_zero_exit_is_reported_and_dir_is_kept() {
    let tmp = tempdir().unwrap();
    let tool = common::sh_tool(
        tmp.path(),
        "demucs.sh",
        "echo 'RuntimeError: CUDA out of memory' >&2\nexit 2\n",
    );
    let audio = tmp.path().join("audio.mp3");
    fs::write(&audio, b"ID3").unwrap();
    let stems_root = tmp.path().join("stems_");

    let demucs = Demucs::new(DemucsSettings {
        command: tool,
        ..DemucsSettings::default()
    });
    let err = separate(&demucs, &audio, &stems_root, "abc").unwrap_err();

    match err {
        StemsError::ToolFailed { status, stderr, .. } => {
            assert_eq!(status.code(), Some(2));
            assert!(stderr.contains("out of memory"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(stems_root.join("abc").is_dir());
}

#[test]
fn missing_demucs_binary_is_a_spawn_error() {
    let tmp = tempdir().unwrap();
    let demucs = Demucs::new(DemucsSettings {
        command: yt_stems::ToolCommand::new("no-such-demucs-binary-4242"),
        ..DemucsSettings::default()
    });
    let err = separate(&demucs, &tmp.path().join("audio.mp3"), tmp.path(), "x").unwrap_err();
    assert!(matches!(err, StemsError::Spawn { .. }), "got {err}");
}
