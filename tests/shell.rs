use std::env;
use std::fs;
use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::{Child, Command, Output, Stdio};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

fn test_home() -> PathBuf {
    let home = env::temp_dir().join(format!("minish_it_home_{}", std::process::id()));
    fs::create_dir_all(&home).unwrap();
    home
}

fn spawn_shell(args: &[&str]) -> Child {
    Command::new(env!("CARGO_BIN_EXE_minish"))
        .args(args)
        .env("HOME", test_home())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap()
}

fn run_shell(args: &[&str], input: &str) -> Output {
    let mut child = spawn_shell(args);
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_echo_joins_with_trailing_space() {
    let output = run_shell(&[], "echo hello world\n");
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "Shell> hello world \nShell> ");
}

#[test]
fn test_empty_lines_reprompt() {
    let output = run_shell(&[], "\n   \n\t\n");
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "Shell> ".repeat(4));
    assert_eq!(stderr_of(&output), "");
}

#[test]
fn test_setenv_env_and_echo_expansion() {
    let output = run_shell(
        &[],
        "setenv MINISH_IT_K V\nenv\necho $MINISH_IT_K $MINISH_IT_UNSET done\n",
    );
    let stdout = stdout_of(&output);

    assert!(stdout.lines().any(|line| line.ends_with("MINISH_IT_K=V")));
    assert!(stdout.contains("V done \n"));
}

#[test]
fn test_no_expand_flag_prints_literal() {
    let output = run_shell(&["-n"], "setenv MINISH_IT_LIT V\necho $MINISH_IT_LIT\n");
    assert!(stdout_of(&output).contains("$MINISH_IT_LIT \n"));
}

#[test]
fn test_children_inherit_setenv() {
    let output = run_shell(&[], "setenv MINISH_IT_CHILD inherited\nprintenv MINISH_IT_CHILD\n");
    assert!(stdout_of(&output).contains("inherited\n"));
}

#[test]
fn test_setenv_needs_two_arguments() {
    let output = run_shell(&[], "setenv ONLY\necho next\n");
    assert!(stderr_of(&output).contains("Expected two arguments for \"setenv\""));
    assert!(stdout_of(&output).contains("next \n"));
}

#[test]
fn test_cd_failure_keeps_shell_alive() {
    let output = run_shell(&[], "cd /nonexistent\necho next\ncd\n");
    let stderr = stderr_of(&output);

    assert!(output.status.success());
    assert!(stderr.contains("cd: "));
    assert!(stderr.contains("Expected argument to \"cd\""));
    assert!(stdout_of(&output).contains("next \n"));
}

#[test]
fn test_cd_then_pwd() {
    let target = env::temp_dir().canonicalize().unwrap();
    let output = run_shell(&[], &format!("cd {}\npwd\n", target.display()));
    assert!(stdout_of(&output).contains(&format!("{}\n", target.display())));
}

#[test]
fn test_exec_failure_reported_by_child() {
    let output = run_shell(&[], "minish-no-such-command --flag\necho next\n");
    assert!(output.status.success());
    assert!(stderr_of(&output).contains("execvp: "));
    assert!(stdout_of(&output).contains("next \n"));
}

#[test]
fn test_external_foreground_output() {
    let output = run_shell(&[], "printf abc\necho after\n");
    assert!(stdout_of(&output).contains("abcShell> after \n"));
}

#[test]
fn test_background_launch() {
    let output = run_shell(&[], "sleep 0.2 &\necho next\n");
    let stdout = stdout_of(&output);

    assert!(stdout.contains("Process "));
    assert!(stdout.contains(" running in background\n"));
    assert!(stdout.contains("next \n"));
}

#[test]
fn test_exit_stops_reading() {
    let output = run_shell(&[], "echo before\nexit\necho after\n");
    let stdout = stdout_of(&output);

    assert!(output.status.success());
    assert!(stdout.contains("before \n"));
    assert!(!stdout.contains("after"));
}

#[test]
fn test_exitfoo_is_an_external_command() {
    let output = run_shell(&[], "exitfoo\necho still running\n");
    assert!(stderr_of(&output).contains("execvp: "));
    assert!(stdout_of(&output).contains("still running \n"));
}

#[test]
fn test_end_of_input_exits_cleanly() {
    let output = run_shell(&[], "echo only\n");
    assert_eq!(output.status.code(), Some(0));
}

#[test]
fn test_foreground_timeout_kills_child() {
    let start = Instant::now();
    let output = run_shell(&["-t", "1"], "sleep 30\necho after\n");
    let elapsed = start.elapsed();
    let stdout = stdout_of(&output);

    assert!(output.status.success());
    assert!(elapsed < Duration::from_secs(10), "took {:?}", elapsed);
    assert!(stdout.contains("Foreground process "));
    assert!(stdout.contains(" terminated due to timeout"));
    assert!(stdout.contains("after \n"));
}

#[test]
fn test_fast_command_is_not_timed_out() {
    let output = run_shell(&["-t", "5"], "sleep 0.1\necho after\n");
    let stdout = stdout_of(&output);

    assert!(!stdout.contains("terminated due to timeout"));
    assert!(stdout.contains("after \n"));
}

#[test]
fn test_rc_file_settings() {
    let rc = env::temp_dir().join(format!("minish_it_rc_{}", std::process::id()));
    fs::write(
        &rc,
        "# test rc\nset prompt \"rc> \"\nset max_args 2\nsetenv MINISH_IT_RC from_rc\n",
    )
    .unwrap();

    let output = run_shell(
        &["-c", rc.to_str().unwrap()],
        "echo a b c\necho $MINISH_IT_RC\n",
    );
    assert_eq!(stdout_of(&output), "rc> a \nrc> from_rc \nrc> ");

    let _ = fs::remove_file(rc);
}

#[test]
fn test_missing_explicit_config_fails() {
    let output = run_shell(&["-c", "/nonexistent/minishrc"], "");
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("Config file not found"));
}

#[test]
fn test_version_and_bad_flags() {
    let output = run_shell(&["--version"], "");
    assert!(output.status.success());
    assert!(stdout_of(&output).starts_with("minish "));

    let output = run_shell(&["--bogus"], "");
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr_of(&output).contains("Unknown flag --bogus"));
}

fn wait_for_output(buffer: &Arc<Mutex<Vec<u8>>>, needle: &str, count: usize) -> bool {
    let deadline = Instant::now() + Duration::from_secs(10);
    while Instant::now() < deadline {
        let seen = String::from_utf8_lossy(&buffer.lock().unwrap()).into_owned();
        if seen.matches(needle).count() >= count {
            return true;
        }
        thread::sleep(Duration::from_millis(20));
    }
    false
}

fn capture_stdout(child: &mut Child) -> (Arc<Mutex<Vec<u8>>>, thread::JoinHandle<()>) {
    let mut stdout = child.stdout.take().unwrap();
    let buffer = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&buffer);
    let reader = thread::spawn(move || {
        let mut chunk = [0u8; 256];
        while let Ok(n) = stdout.read(&mut chunk) {
            if n == 0 {
                break;
            }
            sink.lock().unwrap().extend_from_slice(&chunk[..n]);
        }
    });
    (buffer, reader)
}

fn interrupt(child: &Child) {
    unsafe {
        libc::kill(child.id() as libc::pid_t, libc::SIGINT);
    }
}

#[test]
fn test_interrupt_does_not_kill_shell() {
    let mut child = spawn_shell(&[]);
    let (buffer, reader) = capture_stdout(&mut child);

    assert!(wait_for_output(&buffer, "Shell> ", 1));
    interrupt(&child);
    assert!(wait_for_output(&buffer, "Shell does not exit", 1));
    assert!(wait_for_output(&buffer, "Shell> ", 2));

    let mut stdin = child.stdin.take().unwrap();
    stdin.write_all(b"echo alive\nexit\n").unwrap();
    drop(stdin);

    let status = child.wait().unwrap();
    reader.join().unwrap();

    let seen = String::from_utf8_lossy(&buffer.lock().unwrap()).into_owned();
    assert!(status.success());
    assert!(seen.contains("Caught signal 2. Shell does not exit. Type 'exit' to quit shell."));
    assert!(seen.contains("alive \n"));
}

#[test]
fn test_interrupt_leaves_foreground_child_running() {
    let mut child = spawn_shell(&[]);
    let (buffer, reader) = capture_stdout(&mut child);
    assert!(wait_for_output(&buffer, "Shell> ", 1));

    let start = Instant::now();
    let mut stdin = child.stdin.take().unwrap();
    stdin.write_all(b"sleep 1\necho after\n").unwrap();
    drop(stdin);

    thread::sleep(Duration::from_millis(300));
    interrupt(&child);

    let status = child.wait().unwrap();
    let elapsed = start.elapsed();
    reader.join().unwrap();

    let seen = String::from_utf8_lossy(&buffer.lock().unwrap()).into_owned();
    let notice = seen.find("Caught signal 2. Shell does not exit.").unwrap();
    let after = seen.find("after \n").unwrap();

    assert!(status.success());
    assert!(notice < after);
    assert!(!seen.contains("terminated due to timeout"));
    assert!(elapsed >= Duration::from_secs(1), "finished after {:?}", elapsed);
}
