use log::LevelFilter;

mod terminal;

use self::terminal::Terminal;

pub fn setup(level: LevelFilter) {
    if log::set_boxed_logger(Box::new(Terminal(level))).is_ok() {
        log::set_max_level(level);
    }
}
