use std::error::Error;
use std::fmt;
use std::fs::File;
use std::io;
use std::io::BufRead;
use std::io::BufReader;
use std::num::{ParseFloatError, ParseIntError};
use std::path::Path;
use std::str::FromStr;

use logger::{Level, Logger};

/// Most levels a skiplist may be configured with.
pub const MAX_LEVEL: usize = 64;

/// How deep `include` directives may nest.
pub const MAX_INCLUDE_DEPTH: usize = 16;

/// Settings for a skiplist and the logger it reports to.
#[derive(Debug, Clone)]
pub struct Config {
    pub maxlevel: usize,
    pub probability: f64,
    pub loglevel: Level,
    pub logfile: Option<String>,
    pub syslog_enabled: bool,
    pub syslog_ident: String,
    pub syslog_facility: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidFormat,
    InvalidParameter,
    UnknownDirective(String),
    IOError(io::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ConfigError::InvalidFormat => f.write_str("invalid format"),
            ConfigError::InvalidParameter => f.write_str("invalid parameter"),
            ConfigError::UnknownDirective(ref d) => write!(f, "unknown directive {:?}", d),
            ConfigError::IOError(ref e) => write!(f, "{}", e),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            ConfigError::IOError(ref e) => Some(e),
            _ => None,
        }
    }
}

/// Splits a configuration line into arguments.  Arguments are separated by
/// whitespace; a double-quoted argument may contain spaces and the escapes
/// `\"`, `\\`, `\n` and `\t`.
fn split_line(line: &str) -> Result<Vec<String>, ConfigError> {
    let mut args = vec![];
    let mut chars = line.chars().peekable();
    loop {
        while chars.peek().map_or(false, |c| c.is_whitespace()) {
            chars.next();
        }
        let mut arg = String::new();
        match chars.peek() {
            None => return Ok(args),
            Some(&'"') => {
                chars.next();
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some('n') => arg.push('\n'),
                            Some('t') => arg.push('\t'),
                            Some(c) => arg.push(c),
                            None => return Err(ConfigError::InvalidFormat),
                        },
                        Some(c) => arg.push(c),
                        // unterminated quotes
                        None => return Err(ConfigError::InvalidFormat),
                    }
                }
                // closing quote must be followed by a space or the end of the line
                if chars.peek().map_or(false, |c| !c.is_whitespace()) {
                    return Err(ConfigError::InvalidFormat);
                }
            }
            Some(_) => {
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() {
                        break;
                    }
                    arg.push(c);
                    chars.next();
                }
            }
        }
        args.push(arg);
    }
}

fn read_string(args: &[String]) -> Result<String, ConfigError> {
    if args.len() != 2 {
        Err(ConfigError::InvalidFormat)
    } else {
        Ok(args[1].clone())
    }
}

fn read_parse<T>(args: &[String]) -> Result<T, ConfigError>
where
    T: FromStr,
{
    let s = read_string(args)?;
    match s.parse() {
        Ok(f) => Ok(f),
        Err(_) => Err(ConfigError::InvalidParameter),
    }
}

fn read_bool(args: &[String]) -> Result<bool, ConfigError> {
    Ok(match &*read_string(args)? {
        "yes" => true,
        "no" => false,
        _ => return Err(ConfigError::InvalidFormat),
    })
}

impl Config {
    pub fn new() -> Config {
        Config {
            maxlevel: 16,
            probability: 0.5,
            loglevel: Level::Notice,
            logfile: None,
            syslog_enabled: false,
            syslog_ident: "skiplist".to_owned(),
            syslog_facility: "local0".to_owned(),
        }
    }

    pub fn parsefile<P: AsRef<Path>>(&mut self, fname: P) -> Result<(), ConfigError> {
        self.parsefile_at(fname.as_ref(), 0)
    }

    /// Applies a single configuration line.  Blank lines and comments are ignored.
    pub fn parseline(&mut self, line: &str) -> Result<(), ConfigError> {
        self.parseline_at(line, 0)
    }

    fn parsefile_at(&mut self, fname: &Path, depth: usize) -> Result<(), ConfigError> {
        let file = BufReader::new(File::open(fname)?);
        for line_iter in file.lines() {
            let lline = line_iter?;
            self.parseline_at(&lline, depth)?;
        }
        Ok(())
    }

    /// `depth` counts the `include` directives leading to this line.
    fn parseline_at(&mut self, line: &str, depth: usize) -> Result<(), ConfigError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(());
        }

        let args = split_line(line)?;
        match &*args[0].to_ascii_lowercase() {
            "maxlevel" => {
                let maxlevel = read_parse(&args)?;
                if maxlevel == 0 || maxlevel > MAX_LEVEL {
                    return Err(ConfigError::InvalidParameter);
                }
                self.maxlevel = maxlevel;
            }
            "probability" => {
                let p: f64 = read_parse(&args)?;
                if !(p > 0.0 && p < 1.0) {
                    return Err(ConfigError::InvalidParameter);
                }
                self.probability = p;
            }
            "loglevel" => {
                self.loglevel = match Level::from_name(&*read_string(&args)?) {
                    Some(level) => level,
                    None => return Err(ConfigError::InvalidParameter),
                }
            }
            "logfile" => {
                let logfile = read_string(&args)?;
                self.logfile = if logfile.is_empty() { None } else { Some(logfile) };
            }
            "syslog-enabled" => self.syslog_enabled = read_bool(&args)?,
            "syslog-ident" => self.syslog_ident = read_string(&args)?,
            "syslog-facility" => self.syslog_facility = read_string(&args)?,
            "include" => {
                let path = read_string(&args)?;
                if depth >= MAX_INCLUDE_DEPTH {
                    return Err(ConfigError::InvalidParameter);
                }
                self.parsefile_at(Path::new(&path), depth + 1)?;
            }
            _ => return Err(ConfigError::UnknownDirective(args[0].clone())),
        };
        Ok(())
    }

    /// Creates a logger with the configured level, output and syslog settings.
    pub fn logger(&self) -> io::Result<Logger> {
        let mut logger = match self.logfile {
            Some(ref path) => Logger::file(self.loglevel, path)?,
            None => Logger::new(self.loglevel),
        };
        if self.syslog_enabled {
            logger.set_syslog(&self.syslog_ident, &self.syslog_facility)?;
        }
        Ok(logger)
    }
}

impl Default for Config {
    fn default() -> Config {
        Config::new()
    }
}

impl From<io::Error> for ConfigError {
    fn from(e: io::Error) -> ConfigError { ConfigError::IOError(e) }
}

impl From<ParseIntError> for ConfigError {
    fn from(_: ParseIntError) -> ConfigError { ConfigError::InvalidParameter }
}

impl From<ParseFloatError> for ConfigError {
    fn from(_: ParseFloatError) -> ConfigError { ConfigError::InvalidParameter }
}
