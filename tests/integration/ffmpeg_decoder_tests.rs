/*!
 * Tests for the process backend, using small shell scripts in place of ffmpeg
 */

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use anyhow::Result;

use subclip::decoder::{Decoder, DecoderInvocation, ExtractionOutcome, FfmpegDecoder};
use crate::common;

fn invocation(output_dir: &Path) -> DecoderInvocation {
    DecoderInvocation {
        input: PathBuf::from("/media/movie.mkv"),
        start: "00:00:01.000".to_string(),
        end: "00:00:02.500".to_string(),
        output: output_dir.join("clip_000001.wav"),
    }
}

fn write_script(dir: &Path, name: &str, body: &str) -> Result<PathBuf> {
    let path = common::create_test_file(dir, name, &format!("#!/bin/sh\n{}\n", body))?;
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))?;
    Ok(path)
}

fn decoder_for(script: &Path) -> FfmpegDecoder {
    FfmpegDecoder::new(script.to_string_lossy())
}

/// Test that a zero exit status is a success
#[tokio::test]
async fn test_decode_withZeroExit_shouldSucceed() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let script = write_script(temp_dir.path(), "ok.sh", "exit 0")?;

    let outcome = decoder_for(&script).decode(&invocation(temp_dir.path())).await;

    assert_eq!(outcome, ExtractionOutcome::Succeeded);

    Ok(())
}

/// Test that the tool receives the arguments in the fixed order
#[tokio::test]
async fn test_decode_shouldPassArgumentsInOrder() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let record = temp_dir.path().join("args.txt");
    let script = write_script(
        temp_dir.path(),
        "record.sh",
        &format!("printf '%s\\n' \"$@\" > '{}'", record.display()),
    )?;
    let invocation = invocation(temp_dir.path());

    let outcome = decoder_for(&script).decode(&invocation).await;
    assert!(outcome.is_success());

    let recorded = fs::read_to_string(&record)?;
    let args: Vec<&str> = recorded.lines().collect();
    let output = invocation.output.to_string_lossy().to_string();
    assert_eq!(args, vec![
        "-i", "/media/movie.mkv", "-ss", "00:00:01.000", "-to", "00:00:02.500", "-vn",
        "-ab", "16000", "-ar", "16000", "-ac", "1", output.as_str(),
    ]);

    Ok(())
}

/// Test that the overwrite flag comes before every other argument
#[tokio::test]
async fn test_decode_withOverwrite_shouldPrependFlag() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let record = temp_dir.path().join("args.txt");
    let script = write_script(
        temp_dir.path(),
        "record.sh",
        &format!("printf '%s\\n' \"$@\" > '{}'", record.display()),
    )?;

    decoder_for(&script).with_overwrite(true).decode(&invocation(temp_dir.path())).await;

    let recorded = fs::read_to_string(&record)?;
    assert_eq!(recorded.lines().next(), Some("-y"));
    assert_eq!(recorded.lines().count(), 15);

    Ok(())
}

/// Test that a non-zero exit carries its code and the filtered stderr
#[tokio::test]
async fn test_decode_withNonZeroExit_shouldReturnFailedWithDetail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let script = write_script(
        temp_dir.path(),
        "fail.sh",
        "echo 'ffmpeg version 6.0' >&2\necho '/media/movie.mkv: No such file or directory' >&2\nexit 3",
    )?;

    let outcome = decoder_for(&script).decode(&invocation(temp_dir.path())).await;

    assert_eq!(outcome, ExtractionOutcome::Failed {
        code: Some(3),
        detail: "/media/movie.mkv: No such file or directory".to_string(),
    });

    Ok(())
}

/// Test that a program that cannot be started is an error, not a failure
#[tokio::test]
async fn test_decode_withMissingProgram_shouldReturnErrored() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let decoder = FfmpegDecoder::new(temp_dir.path().join("no-such-decoder").to_string_lossy());

    let outcome = decoder.decode(&invocation(temp_dir.path())).await;

    match outcome {
        ExtractionOutcome::Errored { cause } => assert!(cause.starts_with("failed to launch")),
        other => panic!("expected an errored outcome, got {:?}", other),
    }

    Ok(())
}

/// Test that a hung tool is killed once its timeout elapses
#[tokio::test]
async fn test_decode_withTimeout_shouldKillAndReturnErrored() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let script = write_script(temp_dir.path(), "hang.sh", "sleep 10")?;
    let decoder = decoder_for(&script).with_timeout(Some(Duration::from_millis(200)));

    let started = Instant::now();
    let outcome = decoder.decode(&invocation(temp_dir.path())).await;

    assert!(started.elapsed() < Duration::from_secs(5));
    match outcome {
        ExtractionOutcome::Errored { cause } => assert!(cause.contains("timed out")),
        other => panic!("expected an errored outcome, got {:?}", other),
    }

    Ok(())
}
