use std::fmt::{Debug, Error, Formatter};
use std::fs::{File, OpenOptions};
use std::io;
use std::io::{stderr, stdout, Write};
use std::path::Path;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;

/// Macro to log a message. Uses the `format!` syntax.
/// See `std::fmt` for more information.
///
/// # Examples
///
/// ```
/// # #[macro_use(log)]
/// # extern crate logger;
/// # use logger::{Logger, Level};
/// #
/// # fn main() {
/// # let logger = Logger::new(Level::Warning);
/// log!(logger, Debug, "hello {}", "world");
/// # }
/// ```
#[macro_export]
macro_rules! log {
    ($logger: expr, $level: ident, $($arg:tt)*) => ({
        $logger.log($crate::Level::$level, format!($($arg)*))
    })
}

/// Macro to send a message to a `Sender<(Level, String)>`.
/// Uses the `format!` syntax.
///
/// # Examples
///
/// ```
/// # #[macro_use(sendlog)]
/// # extern crate logger;
/// # use logger::{Logger, Level};
/// # use std::sync::mpsc::channel;
/// #
/// # fn main() {
/// # let (tx, rx) = channel();
/// # let logger = Logger::channel(Level::Debug, tx);
/// # let sender = logger.sender();
/// sendlog!(sender, Debug, "hello {}", "world").unwrap();
/// # assert_eq!(rx.recv().unwrap(), b"hello world\n");
/// # }
/// ```
#[macro_export]
macro_rules! sendlog {
    ($sender: expr, $level: ident, $($arg:tt)*) => ({
        $sender.send(($crate::Level::$level, format!($($arg)*)))
    })
}

enum Output {
    /// Sends logs to a channel
    Channel(Sender<Vec<u8>>),
    /// Writes to the standard output
    Stdout,
    /// Writes to the standard error
    Stderr,
    /// Writes to a `File` in `String` path
    File(File, String),
}

impl Output {
    fn file(path: &str) -> io::Result<Output> {
        let file = OpenOptions::new().append(true).create(true).open(Path::new(path))?;
        Ok(Output::File(file, path.to_owned()))
    }
}

impl Debug for Output {
    fn fmt(&self, fmt: &mut Formatter) -> Result<(), Error> {
        match *self {
            Output::Channel(_) => fmt.write_str("Channel"),
            Output::Stderr => fmt.write_str("Stderr"),
            Output::Stdout => fmt.write_str("Stdout"),
            Output::File(_, ref filename) => fmt.write_fmt(format_args!("File: {}", filename)),
        }
    }
}

impl Write for Output {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        match *self {
            Output::Channel(ref v) => match v.send(data.to_vec()) {
                Ok(_) => Ok(data.len()),
                Err(_) => Err(io::Error::new(io::ErrorKind::BrokenPipe, "log channel closed")),
            },
            Output::Stderr => stderr().write(data),
            Output::Stdout => stdout().write(data),
            Output::File(ref mut v, _) => v.write(data),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match *self {
            Output::Channel(_) => Ok(()),
            Output::Stderr => stderr().flush(),
            Output::Stdout => stdout().flush(),
            Output::File(ref mut v, _) => v.flush(),
        }
    }
}

/// A level that identifies a log message.
/// A lower level includes all higher levels.
#[derive(PartialEq, Clone, Copy, Debug)]
pub enum Level {
    Debug,
    Verbose,
    Notice,
    Warning,
}

impl Level {
    /// Whether the level is equal or lower than another level.
    /// For example, `Debug` includes all other levels, while `Warning` only
    /// includes itself.
    ///
    /// # Examples
    ///
    /// ```
    /// # use logger::Level;
    /// #
    /// assert!(Level::Debug.contains(&Level::Debug));
    /// assert!(!Level::Warning.contains(&Level::Debug));
    /// assert!(Level::Debug.contains(&Level::Warning));
    /// ```
    pub fn contains(&self, other: &Level) -> bool {
        match *self {
            Level::Debug => true,
            Level::Verbose => *other != Level::Debug,
            Level::Notice => *other == Level::Notice || *other == Level::Warning,
            Level::Warning => *other == Level::Warning,
        }
    }

    /// Parses a level by its lowercase name, as used in configuration files.
    ///
    /// ```
    /// # use logger::Level;
    /// #
    /// assert_eq!(Level::from_name("notice"), Some(Level::Notice));
    /// assert_eq!(Level::from_name("loud"), None);
    /// ```
    pub fn from_name(name: &str) -> Option<Level> {
        match name {
            "debug" => Some(Level::Debug),
            "verbose" => Some(Level::Verbose),
            "notice" => Some(Level::Notice),
            "warning" => Some(Level::Warning),
            _ => None,
        }
    }
}

#[cfg(unix)]
type SyslogWriter = syslog::Logger<syslog::LoggerBackend, syslog::Formatter3164>;

#[cfg(unix)]
fn send_syslog(w: &mut SyslogWriter, level: Level, msg: &str) -> Result<(), String> {
    let r = match level {
        Level::Debug => w.debug(msg),
        Level::Verbose => w.info(msg),
        Level::Notice => w.notice(msg),
        Level::Warning => w.warning(msg),
    };
    r.map_err(|e| e.to_string())
}

#[cfg(unix)]
fn syslog_facility(facility: &str) -> syslog::Facility {
    match &*facility.to_ascii_lowercase() {
        "local0" => syslog::Facility::LOG_LOCAL0,
        "local1" => syslog::Facility::LOG_LOCAL1,
        "local2" => syslog::Facility::LOG_LOCAL2,
        "local3" => syslog::Facility::LOG_LOCAL3,
        "local4" => syslog::Facility::LOG_LOCAL4,
        "local5" => syslog::Facility::LOG_LOCAL5,
        "local6" => syslog::Facility::LOG_LOCAL6,
        "local7" => syslog::Facility::LOG_LOCAL7,
        _ => syslog::Facility::LOG_USER,
    }
}

/// Everything the writer thread can be asked to do.
enum Message {
    Log(Level, String),
    SetLevel(Level),
    SetOutput(Output),
    #[cfg(unix)]
    SetSyslog(Option<Box<SyslogWriter>>),
}

/// A handle to a background thread that writes log lines.  Clones share the
/// same thread; it exits once every handle is dropped.
#[derive(Clone)]
pub struct Logger {
    tx: Sender<Message>,
}

fn run(rx: Receiver<Message>, mut level: Level, mut output: Output) {
    #[cfg(unix)]
    let mut syslog_writer: Option<Box<SyslogWriter>> = None;
    while let Ok(message) = rx.recv() {
        match message {
            Message::Log(lvl, msg) => {
                if !level.contains(&lvl) {
                    continue;
                }
                if let Err(e) = output.write_all(format!("{}\n", msg).as_bytes()) {
                    // failing to log a message... will write straight to stderr
                    let _ = writeln!(stderr(), "Failed to log {:?} {}", e, msg);
                }
                #[cfg(unix)]
                {
                    if let Some(ref mut w) = syslog_writer {
                        if let Err(e) = send_syslog(w, lvl, &msg) {
                            let _ = writeln!(stderr(), "Failed to log {} {}", e, msg);
                        }
                    }
                }
            }
            Message::SetLevel(lvl) => level = lvl,
            Message::SetOutput(out) => output = out,
            #[cfg(unix)]
            Message::SetSyslog(w) => syslog_writer = w,
        }
    }
}

impl Logger {
    /// Creates a new `Logger` for a given `Output` and severity `Level`.
    fn create(level: Level, output: Output) -> Logger {
        let (tx, rx) = channel();
        thread::spawn(move || run(rx, level, output));
        Logger { tx }
    }

    fn send(&self, message: Message) {
        // the writer thread only stops once every sender is gone, so this
        // cannot fail while `self` is alive
        let _ = self.tx.send(message);
    }

    /// Creates a new logger that writes in the standard output.
    ///
    /// # Examples
    /// ```
    /// # use logger::{Logger, Level};
    /// #
    /// let logger = Logger::new(Level::Warning);
    /// logger.log(Level::Warning, "hello world".to_owned());
    /// ```
    pub fn new(level: Level) -> Self {
        Self::create(level, Output::Stdout)
    }

    /// Creates a new logger that writes in the standard error.
    pub fn new_err(level: Level) -> Self {
        Self::create(level, Output::Stderr)
    }

    /// Creates a new logger that sends log messages to `s`.
    ///
    /// # Examples
    /// ```
    /// # use logger::{Logger, Level};
    /// # use std::sync::mpsc::channel;
    /// #
    /// let (tx, rx) = channel();
    /// let logger = Logger::channel(Level::Debug, tx);
    /// logger.log(Level::Debug, "hello world".to_owned());
    /// assert_eq!(rx.recv().unwrap(), b"hello world\n".to_vec());
    /// ```
    pub fn channel(level: Level, s: Sender<Vec<u8>>) -> Self {
        Self::create(level, Output::Channel(s))
    }

    /// Creates a new logger that appends to a file.
    pub fn file(level: Level, path: &str) -> io::Result<Self> {
        Ok(Self::create(level, Output::file(path)?))
    }

    /// Disables syslog
    #[cfg(unix)]
    pub fn disable_syslog(&mut self) {
        self.send(Message::SetSyslog(None));
    }

    #[cfg(not(unix))]
    pub fn disable_syslog(&mut self) {}

    /// Enables syslog.
    #[cfg(unix)]
    pub fn set_syslog(&mut self, ident: &str, facility: &str) -> io::Result<()> {
        let formatter = syslog::Formatter3164 {
            facility: syslog_facility(facility),
            hostname: None,
            process: ident.to_owned(),
            pid: std::process::id(),
        };
        let w = syslog::unix(formatter)
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
        self.send(Message::SetSyslog(Some(Box::new(w))));
        Ok(())
    }

    #[cfg(not(unix))]
    pub fn set_syslog(&mut self, _: &str, _: &str) -> io::Result<()> {
        Ok(())
    }

    /// Changes the output to be a file in `path`.
    pub fn set_logfile(&mut self, path: &str) -> io::Result<()> {
        self.send(Message::SetOutput(Output::file(path)?));
        Ok(())
    }

    /// Changes the log level.
    pub fn set_loglevel(&mut self, level: Level) {
        self.send(Message::SetLevel(level));
    }

    /// Creates a new sender to log messages.
    pub fn sender(&self) -> Sender<(Level, String)> {
        let (tx, rx) = channel();
        let tx2 = self.tx.clone();
        thread::spawn(move || {
            while let Ok((level, message)) = rx.recv() {
                if tx2.send(Message::Log(level, message)).is_err() {
                    break;
                }
            }
        });
        tx
    }

    /// Logs a message with a log level.
    pub fn log(&self, level: Level, msg: String) {
        self.send(Message::Log(level, msg));
    }
}

impl Debug for Logger {
    fn fmt(&self, fmt: &mut Formatter) -> Result<(), Error> {
        fmt.write_str("Logger")
    }
}
