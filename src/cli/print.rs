/// 输出一行文本，仅在目标为终端时添加ANSI颜色。写入失败（例如管道已关闭）时静默忽略。
#[macro_export]
macro_rules! println_colored {
    ($stream:ident, $color:literal, $($arg:tt)*) => {{
        use std::io::{IsTerminal, Write};
        let mut out = std::io::$stream().lock();
        let text = format!($($arg)*);
        let _ = if out.is_terminal() {
            writeln!(out, "\x1b[{}m{}\x1b[0m", $color, text)
        } else {
            writeln!(out, "{}", text)
        };
    }};
}

#[macro_export]
macro_rules! println_err {
    ($($arg:tt)*) => {
        $crate::println_colored!(stderr, "1;31", $($arg)*)
    };
}

#[macro_export]
macro_rules! println_info {
    ($($arg:tt)*) => {
        $crate::println_colored!(stdout, "1;34", $($arg)*)
    };
}

#[macro_export]
macro_rules! println_notice {
    ($($arg:tt)*) => {
        $crate::println_colored!(stdout, "35", $($arg)*)
    };
}
