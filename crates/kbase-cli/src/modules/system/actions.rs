use kbase_core::{
    CreateKnowledgeBaseRequest, KnowledgeBaseIdRequest, ListKnowledgeBasesQuery,
    ListKnowledgeBasesRequest, LoginRequest, RegisterRequest, RemoveTagsRequest,
    RenameTagRequest, TenantInfoRequest, UpdateKnowledgeBaseRequest, UserSettingRequest,
};
use schemars::schema_for;
use serde::Serialize;

use crate::cli_args::TypesArgs;

const TYPES: &[(&str, &str)] = &[
    ("login", "Login body; password is encrypted"),
    ("register", "Account registration body"),
    ("user-setting", "Profile and password change body"),
    ("tenant-info", "Tenant model settings body"),
    ("kb-create", "Knowledge base creation body"),
    ("kb-update", "Knowledge base update body"),
    ("kb-id", "Knowledge base removal body"),
    ("kb-list", "Knowledge base list filter body"),
    ("kb-list-query", "Knowledge base list query string"),
    ("rm-tags", "Tag removal body"),
    ("rename-tag", "Tag rename body"),
];

pub(crate) fn handle_types_command(args: TypesArgs) -> anyhow::Result<()> {
    let Some(name) = args.name else {
        println!("TYPE           DESCRIPTION");
        for (name, description) in TYPES {
            println!("{name:<14} {description}");
        }
        return Ok(());
    };
    let schema = match name.as_str() {
        "login" => schema_for!(LoginRequest),
        "register" => schema_for!(RegisterRequest),
        "user-setting" => schema_for!(UserSettingRequest),
        "tenant-info" => schema_for!(TenantInfoRequest),
        "kb-create" => schema_for!(CreateKnowledgeBaseRequest),
        "kb-update" => schema_for!(UpdateKnowledgeBaseRequest),
        "kb-id" => schema_for!(KnowledgeBaseIdRequest),
        "kb-list" => schema_for!(ListKnowledgeBasesRequest),
        "kb-list-query" => schema_for!(ListKnowledgeBasesQuery),
        "rm-tags" => schema_for!(RemoveTagsRequest),
        "rename-tag" => schema_for!(RenameTagRequest),
        other => anyhow::bail!("unknown type: {other}"),
    };
    print_json(&schema)
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
