use anyhow::{Context, Result, bail};
use std::io;
use std::process::Command;
use std::thread;
use std::time::Duration;

#[cfg(target_os = "macos")]
fn browser_command(url: &str) -> io::Result<Command> {
    let mut command = Command::new("open");
    command.arg(url);
    Ok(command)
}

#[cfg(target_os = "linux")]
fn browser_command(url: &str) -> io::Result<Command> {
    let mut command = Command::new("xdg-open");
    command.arg(url);
    Ok(command)
}

#[cfg(target_os = "windows")]
fn browser_command(url: &str) -> io::Result<Command> {
    // The empty argument is the window title `start` expects before the target.
    let mut command = Command::new("cmd");
    command.args(["/C", "start", "", url]);
    Ok(command)
}

#[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
fn browser_command(_url: &str) -> io::Result<Command> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "no default browser launcher on this platform",
    ))
}

/// Hands `url` to the desktop's default handler and waits for the launcher
/// process to exit. The browser itself keeps running.
pub fn open_url_in_default_browser(url: &str) -> Result<()> {
    let status = browser_command(url)
        .and_then(|mut command| command.status())
        .with_context(|| format!("failed launching browser for {url}"))?;
    if !status.success() {
        bail!("browser launcher for {url} exited with {status}");
    }
    Ok(())
}

/// Runs `task` once on a new thread after `delay`.
pub fn spawn_delayed<F>(delay: Duration, task: F) -> io::Result<thread::JoinHandle<()>>
where
    F: FnOnce() + Send + 'static,
{
    thread::Builder::new()
        .name("sitekit-delayed".to_string())
        .spawn(move || {
            thread::sleep(delay);
            task();
        })
}

/// Opens `url` in the default browser after `delay` without blocking the
/// caller. Launch failures are reported on stderr.
pub fn schedule_browser_open(url: String, delay: Duration) -> io::Result<()> {
    spawn_delayed(delay, move || match open_url_in_default_browser(&url) {
        Ok(()) => println!("opened {url}"),
        Err(err) => eprintln!("error: failed opening browser: {err:#}"),
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::spawn_delayed;
    use std::sync::mpsc;
    use std::time::{Duration, Instant};

    #[test]
    fn delayed_task_runs_once_after_delay() {
        let (tx, rx) = mpsc::channel();
        let started = Instant::now();
        let handle = spawn_delayed(Duration::from_millis(50), move || {
            tx.send(Instant::now()).expect("send should work");
        })
        .expect("spawn should work");

        let ran_at = rx
            .recv_timeout(Duration::from_secs(5))
            .expect("task should run");
        assert!(ran_at.duration_since(started) >= Duration::from_millis(50));
        handle.join().expect("thread should finish");
        assert!(rx.try_recv().is_err());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn linux_launches_through_xdg_open() {
        let command = super::browser_command("http://localhost:8000").expect("linux is supported");
        assert_eq!(command.get_program(), "xdg-open");
        let args: Vec<_> = command.get_args().collect();
        assert_eq!(args, ["http://localhost:8000"]);
    }
}
