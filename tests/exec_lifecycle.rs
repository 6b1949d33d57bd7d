#![cfg(unix)]

mod common;
use crate::common::init_tracing;

use std::error::Error;

use anyhow::Result;
use tokio_util::sync::CancellationToken;

use ctxexec::errors::ExecError;
use ctxexec::exec::{CaptureBuffer, Chain, Cmd, Output, Process, chain, hook, post, pre};
use ctxexec::tokenize::Whitespace;
use ctxexec_test_utils::hooks::{CountingHook, RecordPid};
use ctxexec_test_utils::scripts::sh;

type TestResult = std::result::Result<(), Box<dyn Error>>;

fn capture(stdout: &CaptureBuffer) -> impl Fn(&mut Process) -> Result<()> + Send + Sync + 'static {
    let stdout = stdout.clone();
    move |p: &mut Process| -> Result<()> {
        p.set_stdout(Output::Buffer(stdout.clone()));
        Ok(())
    }
}

#[tokio::test]
async fn empty_command_is_invalid_and_creates_nothing() {
    init_tracing();
    let cancel = CancellationToken::new();

    for line in ["", "   ", "\t\n"] {
        let pre_hook = CountingHook::new();
        let post_hook = CountingHook::new();

        let err = Cmd::new(line)
            .exec(&cancel, [pre(pre_hook.clone()), post(post_hook.clone())])
            .await
            .unwrap_err();

        assert!(err.is_invalid_command(), "{line:?} gave {err:?}");
        assert_eq!(pre_hook.calls(), 0);
        assert_eq!(post_hook.calls(), 0);
    }
}

#[tokio::test]
async fn malformed_quoting_is_a_parse_error_not_invalid_command() {
    init_tracing();
    let err = Cmd::new(r#"echo "unterminated"#)
        .exec(&CancellationToken::new(), [])
        .await
        .unwrap_err();

    assert!(matches!(err, ExecError::Parse(_)), "got {err:?}");
}

#[tokio::test]
async fn unknown_executable_is_not_found() {
    init_tracing();
    let pre_hook = CountingHook::new();

    let err = Cmd::new("definitely-not-a-real-binary-4f2a --flag")
        .exec(&CancellationToken::new(), [pre(pre_hook.clone())])
        .await
        .unwrap_err();

    match err {
        ExecError::NotFound { program, .. } => {
            assert_eq!(program, "definitely-not-a-real-binary-4f2a")
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
    assert_eq!(pre_hook.calls(), 0);
}

#[tokio::test]
async fn clean_exit_returns_ok_without_exit_hook() -> TestResult {
    init_tracing();
    let exit_hook = CountingHook::new();
    let post_hook = RecordPid::new();

    Cmd::new("true")
        .exec(
            &CancellationToken::new(),
            [post(post_hook.clone()), ctxexec::exec::done(exit_hook.clone())],
        )
        .await?;

    assert_eq!(exit_hook.calls(), 0);
    assert!(post_hook.pid().is_some());
    Ok(())
}

#[tokio::test]
async fn non_zero_exit_is_reported_with_its_code() {
    init_tracing();
    let err = Cmd::new(sh("exit 7"))
        .exec(&CancellationToken::new(), [])
        .await
        .unwrap_err();

    assert!(matches!(err, ExecError::Exit(_)), "got {err:?}");
    assert_eq!(err.exit_code(), Some(7));
}

#[tokio::test]
async fn failing_pre_hook_aborts_before_start() {
    init_tracing();
    let first = CountingHook::failing("refusing to start");
    let second = CountingHook::new();
    let post_hook = CountingHook::new();

    let err = Cmd::new("true")
        .exec(
            &CancellationToken::new(),
            [
                pre(chain([hook(first.clone()), hook(second.clone())])),
                post(post_hook.clone()),
            ],
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ExecError::Hook(_)), "got {err:?}");
    let cause = std::error::Error::source(&err).map(ToString::to_string);
    assert_eq!(cause.as_deref(), Some("refusing to start"));
    assert_eq!(first.calls(), 1);
    assert_eq!(second.calls(), 0);
    assert_eq!(post_hook.calls(), 0, "no process should have been started");
}

#[tokio::test]
async fn post_hook_errors_are_ignored() -> TestResult {
    init_tracing();
    let post_hook = CountingHook::failing("just informational");

    Cmd::new("true")
        .exec(&CancellationToken::new(), [post(post_hook.clone())])
        .await?;

    assert_eq!(post_hook.calls(), 1);
    Ok(())
}

#[tokio::test]
async fn last_pre_option_wins() -> TestResult {
    init_tracing();
    let overridden = CountingHook::failing("should never run");
    let stdout = CaptureBuffer::new();

    Cmd::new("echo winner")
        .exec(
            &CancellationToken::new(),
            [pre(overridden.clone()), pre(capture(&stdout))],
        )
        .await?;

    assert_eq!(overridden.calls(), 0);
    assert_eq!(stdout.contents(), b"winner\n");
    Ok(())
}

#[tokio::test]
async fn chained_pre_hooks_all_apply() -> TestResult {
    init_tracing();
    let stdout = CaptureBuffer::new();
    let dir = tempfile::tempdir()?;
    let dir_path = dir.path().to_path_buf();

    let hooks = Chain::new()
        .then(capture(&stdout))
        .then(move |p: &mut Process| -> Result<()> {
            p.command_mut().current_dir(&dir_path);
            Ok(())
        });

    Cmd::new("pwd").exec(&CancellationToken::new(), [pre(hooks)]).await?;

    let printed = String::from_utf8(stdout.contents())?;
    assert_eq!(
        std::fs::canonicalize(printed.trim())?,
        std::fs::canonicalize(dir.path())?
    );
    Ok(())
}

#[tokio::test]
async fn shell_metacharacters_are_literal_arguments() -> TestResult {
    init_tracing();
    let stdout = CaptureBuffer::new();

    Cmd::new("echo ps -ef | grep go > out.txt $HOME")
        .exec(&CancellationToken::new(), [pre(capture(&stdout))])
        .await?;

    assert_eq!(stdout.contents(), b"ps -ef | grep go > out.txt $HOME\n");
    Ok(())
}

#[tokio::test]
async fn quoted_arguments_reach_the_program_intact() -> TestResult {
    init_tracing();
    let stdout = CaptureBuffer::new();

    Cmd::new(r#"printf "%s|" 'one two' "three""#)
        .exec(&CancellationToken::new(), [pre(capture(&stdout))])
        .await?;
    assert_eq!(stdout.contents(), b"one two|three|");

    let stdout = CaptureBuffer::new();
    Cmd::new("printf %s| 'one two'")
        .with_tokenizer(Whitespace)
        .exec(&CancellationToken::new(), [pre(capture(&stdout))])
        .await?;
    assert_eq!(stdout.contents(), b"'one|two'|");
    Ok(())
}

#[tokio::test]
async fn relative_paths_are_resolved_from_the_working_directory() -> TestResult {
    init_tracing();
    let err = Cmd::new("./no-such-script.sh")
        .exec(&CancellationToken::new(), [])
        .await
        .unwrap_err();
    assert!(matches!(err, ExecError::NotFound { .. }), "got {err:?}");

    Cmd::new("/bin/sh -c true").exec(&CancellationToken::new(), []).await?;
    Ok(())
}

#[tokio::test]
async fn free_exec_matches_cmd_exec() -> TestResult {
    init_tracing();
    let stdout = CaptureBuffer::new();

    ctxexec::exec::exec("echo via free fn", &CancellationToken::new(), [pre(capture(&stdout))])
        .await?;
    assert_eq!(stdout.contents(), b"via free fn\n");

    let err = ctxexec::exec::exec("", &CancellationToken::new(), [])
        .await
        .unwrap_err();
    assert!(err.is_invalid_command());
    Ok(())
}

#[tokio::test]
async fn a_cmd_can_be_launched_repeatedly() -> TestResult {
    init_tracing();
    let cmd = Cmd::new("true");
    let cancel = CancellationToken::new();
    for _ in 0..3 {
        cmd.exec(&cancel, []).await?;
    }
    Ok(())
}

#[tokio::test]
async fn output_is_discarded_by_default() -> TestResult {
    init_tracing();
    // Nothing to assert on beyond success: with no pre hook both streams go
    // to the null device and the launch must not block on them.
    Cmd::new(sh("yes | head -c 1000000; echo err >&2"))
        .exec(&CancellationToken::new(), [])
        .await?;
    Ok(())
}

#[tokio::test]
async fn writer_sink_receives_all_output() -> TestResult {
    init_tracing();
    let (writer, mut reader) = tokio::io::duplex(64);

    let collect = tokio::spawn(async move {
        let mut received = Vec::new();
        tokio::io::AsyncReadExt::read_to_end(&mut reader, &mut received).await?;
        Ok::<_, std::io::Error>(received)
    });

    let sink = std::sync::Mutex::new(Some(writer));
    let wire = move |p: &mut Process| -> Result<()> {
        let writer = sink
            .lock()
            .map_err(|_| anyhow::anyhow!("sink lock poisoned"))?
            .take()
            .ok_or_else(|| anyhow::anyhow!("writer already used"))?;
        p.set_stdout(Output::Writer(Box::new(writer)));
        Ok(())
    };

    Cmd::new(sh("head -c 5000 /dev/zero"))
        .exec(&CancellationToken::new(), [pre(wire)])
        .await?;

    let received = collect.await??;
    assert_eq!(received.len(), 5000);
    assert!(received.iter().all(|&b| b == 0));
    Ok(())
}

#[tokio::test]
async fn pipe_hook_shares_the_parent_streams() -> TestResult {
    init_tracing();
    Cmd::new("echo visible-in-test-output")
        .exec(&CancellationToken::new(), [pre(ctxexec::exec::Pipe)])
        .await?;
    Ok(())
}

#[tokio::test]
async fn start_failure_is_reported_and_runs_no_later_hooks() -> TestResult {
    use std::os::unix::fs::PermissionsExt;

    init_tracing();
    let dir = tempfile::tempdir()?;
    let bogus = dir.path().join("bogus");
    std::fs::write(&bogus, [0x00, 0x01, 0x02, 0xff, 0xfe])?;
    std::fs::set_permissions(&bogus, std::fs::Permissions::from_mode(0o755))?;

    let post_hook = CountingHook::new();
    let exit_hook = CountingHook::new();
    let err = Cmd::new(format!("{} --flag", bogus.display()))
        .exec(
            &CancellationToken::new(),
            [post(post_hook.clone()), ctxexec::exec::done(exit_hook.clone())],
        )
        .await
        .unwrap_err();

    match &err {
        ExecError::Start { program, .. } => assert!(program.ends_with("bogus"), "{program}"),
        other => panic!("expected Start, got {other:?}"),
    }
    assert_eq!(post_hook.calls(), 0);
    assert_eq!(exit_hook.calls(), 0);
    Ok(())
}
