use crate::utils;

/// `eval "$(opendata env)"` で読み込める形式で出力
pub fn handle() -> anyhow::Result<()> {
    let loaded = utils::load_descriptor_or_exit();

    for (name, value) in loaded.descriptor.environment_pairs() {
        println!("export {}={}", name, utils::shell_escape(value));
    }
    Ok(())
}
