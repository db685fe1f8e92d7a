#[derive(Debug, Eq, PartialEq)]
pub(crate) enum Config {
    /// 帮助 `-h [<topic>]`
    Help,
    /// 版本 `-V`
    Version,
    /// 打印输入、操作、阶段链和输出 `-v`
    Verbose,
    /// 仅解析并构建流水线，不拉取数据 `-d`
    DryRun,
    /// 条件匹配和去重全局忽略大小写 `--nocase`
    Nocase,
}

#[inline]
pub(crate) fn is_nocase(nocase: bool, configs: &[Config]) -> bool {
    nocase || configs.contains(&Config::Nocase)
}
