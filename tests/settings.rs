use std::fs::{create_dir_all, File};
use std::io::Write;

use rand::random;

use config::Config;
use skiplist::SkipList;

macro_rules! config {
    ($str: expr) => ({
        let dirpath = std::env::temp_dir().join("skiplist-tests");
        let _ = create_dir_all(&dirpath);
        let filepath = dirpath.join(format!("{}.conf", random::<u64>()));
        File::create(&filepath).unwrap().write_all($str).unwrap();
        let mut config = Config::new();
        config.parsefile(&filepath).unwrap();
        config
    })
}

#[test]
fn list_from_config() {
    let config = config!(b"maxlevel 5\nprobability 0.25\n");
    let mut list = SkipList::from_config(&config).unwrap();
    assert_eq!(list.max_level(), 5);
    list.extend((0..1000u32).map(|i| (i, ())));
    assert!(list.level() < 5);
    assert_eq!(list.len(), 1000);
}

#[test]
fn default_config() {
    let list: SkipList<u32, u32> = SkipList::from_config(&Config::new()).unwrap();
    assert_eq!(list.max_level(), 16);
    assert!(list.is_empty());
}

#[test]
fn logger_from_config() {
    let dirpath = std::env::temp_dir().join("skiplist-tests");
    let _ = create_dir_all(&dirpath);
    let logpath = dirpath.join(format!("{}.log", random::<u64>()));
    let config = config!(format!("loglevel debug\nlogfile {}\n", logpath.display()).as_bytes());
    let logger = config.logger().unwrap();
    let mut list = SkipList::from_config(&config).unwrap();
    list.set_logger(logger);
    list.insert(1u32, 1u32);
    list.clear();
    assert!(list.is_empty());
}

#[test]
fn level_limits_agree() {
    assert_eq!(config::MAX_LEVEL, skiplist::MAX_LEVEL);
    let config = config!(b"maxlevel 64");
    let list: SkipList<u32, u32> = SkipList::from_config(&config).unwrap();
    assert_eq!(list.max_level(), 64);
}
