use crate::knowledge::KnowledgeBase;

pub fn cmd_list(args: &[String]) -> Result<String, String> {
    let kb = KnowledgeBase::gatk_sv();
    match args.first().map(String::as_str) {
        None | Some("modules") => Ok(kb
            .modules()
            .map(|(id, info)| format!("{id}\t{}\t{}", info.name, info.purpose))
            .collect::<Vec<_>>()
            .join("\n")),
        Some("sv-types") | Some("types") => Ok(kb
            .sv_types()
            .map(|(code, info)| format!("{code}\t{}\t{}", info.name, info.description))
            .collect::<Vec<_>>()
            .join("\n")),
        Some(other) => Err(format!(
            "unknown list target `{other}`; expected `modules` or `sv-types`"
        )),
    }
}
