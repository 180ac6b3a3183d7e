use kbase_core::KnowledgeBase;

pub(crate) fn print_kb_table(kbs: &[KnowledgeBase], total: u64) {
    let mut id_width = "ID".len();
    let mut name_width = "NAME".len();
    for kb in kbs {
        id_width = id_width.max(kb.id.len());
        name_width = name_width.max(kb.name.chars().count());
    }

    println!(
        "{:<id_width$}  {:<name_width$}  {:>5}  {:>7}  STATUS",
        "ID",
        "NAME",
        "DOCS",
        "CHUNKS",
        id_width = id_width,
        name_width = name_width
    );
    for kb in kbs {
        let status = if kb.is_valid() { "valid" } else { "invalid" };
        println!(
            "{:<id_width$}  {:<name_width$}  {:>5}  {:>7}  {}",
            kb.id,
            kb.name,
            kb.doc_num,
            kb.chunk_num,
            status,
            id_width = id_width,
            name_width = name_width
        );
    }
    println!("{total} total");
}
