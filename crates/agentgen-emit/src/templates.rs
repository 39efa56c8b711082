//! Shared template environment for the rendered backends.

use crate::literal::{py_block, py_str};
use crate::model::EmitModel;
use agentgen_core::{Error, Result};
use minijinja::{AutoEscape, Environment, ErrorKind};
use serde::Serialize;

pub const MODULE_TEMPLATE: &str = "crewai.py.j2";
pub const CREW_TEMPLATE: &str = "crew.py.j2";
pub const MAIN_TEMPLATE: &str = "main.py.j2";

/// Environment with every embedded template and the Python literal filters.
pub fn environment() -> Result<Environment<'static>> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.set_keep_trailing_newline(true);
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.add_filter("pystr", |value: String| py_str(&value).map_err(filter_error));
    env.add_filter("pyblock", |value: String| py_block(&value).map_err(filter_error));

    for (name, source) in [
        (MODULE_TEMPLATE, include_str!("../templates/crewai.py.j2")),
        (CREW_TEMPLATE, include_str!("../templates/crew.py.j2")),
        (MAIN_TEMPLATE, include_str!("../templates/main.py.j2")),
    ] {
        env.add_template(name, source).map_err(template_error)?;
    }
    Ok(env)
}

/// Template context: the model's fields plus the docstring header.
#[derive(Serialize)]
struct Page<'a> {
    #[serde(flatten)]
    model: &'a EmitModel,
    header: String,
}

pub fn render(
    env: &Environment<'_>,
    name: &str,
    model: &EmitModel,
    target: &str,
) -> Result<String> {
    let page = Page {
        model,
        header: format!("\n{}\n", model.header(target)),
    };
    env.get_template(name)
        .and_then(|t| t.render(&page))
        .map_err(template_error)
}

fn filter_error(e: Error) -> minijinja::Error {
    minijinja::Error::new(ErrorKind::InvalidOperation, e.to_string())
}

fn template_error(e: minijinja::Error) -> Error {
    Error::emission(format!("template: {:#}", e))
}
