// src/scaffold/csproj.rs

use lazy_static::lazy_static;
use regex::{NoExpand, Regex};
use thiserror::Error;

lazy_static! {
    static ref VERSION_ELEMENT: Regex = Regex::new(r"<Version>[^<]*</Version>").expect("valid Version regex");
    static ref PROPERTY_GROUP_END: Regex =
        Regex::new(r"(?m)^([ \t]*)</PropertyGroup>").expect("valid PropertyGroup regex");
    static ref PROJECT_END: Regex = Regex::new(r"(?m)^</Project>").expect("valid Project regex");
    static ref REFERENCE_GROUP: Regex =
        Regex::new(r"(?m)^[ \t]*<ItemGroup>\r?\n([ \t]*)<ProjectReference ").expect("valid ItemGroup regex");
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CsprojError {
    #[error("The project file has no closing </Project> element.")]
    MissingProjectElement,
    #[error("The project file has no <PropertyGroup> to hold a <Version>.")]
    MissingPropertyGroup,
}

/// Adds `<ProjectReference Include="..."/>`, joining an existing reference
/// group when there is one. Returns the input unchanged if the reference exists.
pub fn add_project_reference(csproj: &str, include: &str) -> Result<String, CsprojError> {
    let include = include.replace('/', "\\");
    if csproj.contains(&format!("<ProjectReference Include=\"{}\"", include)) {
        return Ok(csproj.to_string());
    }
    let newline = if csproj.contains("\r\n") { "\r\n" } else { "\n" };

    if let Some(captures) = REFERENCE_GROUP.captures(csproj) {
        let indent = captures.get(1).map_or("    ", |m| m.as_str());
        let at = captures.get(1).map_or(0, |m| m.start());
        let mut text = csproj.to_string();
        text.insert_str(at, &format!("{}<ProjectReference Include=\"{}\" />{}", indent, include, newline));
        return Ok(text);
    }

    let at = PROJECT_END
        .find(csproj)
        .ok_or(CsprojError::MissingProjectElement)?
        .start();
    let group = format!(
        "  <ItemGroup>{nl}    <ProjectReference Include=\"{}\" />{nl}  </ItemGroup>{nl}{nl}",
        include,
        nl = newline
    );
    let mut text = csproj.to_string();
    text.insert_str(at, &group);
    Ok(text)
}

/// Sets `<Version>`, replacing the first existing element or adding one to
/// the first `<PropertyGroup>`.
pub fn set_version(csproj: &str, version: &str) -> Result<String, CsprojError> {
    let element = format!("<Version>{}</Version>", version);
    if VERSION_ELEMENT.is_match(csproj) {
        return Ok(VERSION_ELEMENT.replace(csproj, NoExpand(&element)).into_owned());
    }
    let newline = if csproj.contains("\r\n") { "\r\n" } else { "\n" };
    let captures = PROPERTY_GROUP_END
        .captures(csproj)
        .ok_or(CsprojError::MissingPropertyGroup)?;
    let (at, indent) = match (captures.get(0), captures.get(1)) {
        (Some(whole), Some(indent)) => (whole.start(), indent.as_str()),
        _ => return Err(CsprojError::MissingPropertyGroup),
    };
    let mut text = csproj.to_string();
    text.insert_str(at, &format!("{}  {}{}", indent, element, newline));
    Ok(text)
}
