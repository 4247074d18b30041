use crate::utils;

/// 正規化した記述子を stdout に出力
pub fn handle(json: bool) -> anyhow::Result<()> {
    let loaded = utils::load_descriptor_or_exit();

    let rendered = if json {
        loaded.descriptor.to_json_pretty()?
    } else {
        loaded.descriptor.to_yaml()?
    };
    print!("{}", rendered);
    if !rendered.ends_with('\n') {
        println!();
    }

    if loaded.has_errors() {
        utils::print_issues(&loaded.issues);
    }
    Ok(())
}
