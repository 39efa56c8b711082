//! Template backend: renders the embedded module template with minijinja.

use super::MODULE_NAMES;
use crate::model::EmitModel;
use crate::registry::{Artifact, Emitter, Target};
use crate::templates::{self, MODULE_TEMPLATE};
use agentgen_core::{Ir, Result};
use minijinja::Environment;

pub struct TemplateEmitter {
    env: Environment<'static>,
}

impl TemplateEmitter {
    pub fn new() -> Result<Self> {
        Ok(Self {
            env: templates::environment()?,
        })
    }
}

impl Emitter for TemplateEmitter {
    fn target(&self) -> Target {
        Target::CrewaiTemplate
    }

    fn emit(&self, ir: &Ir, stem: &str) -> Result<Artifact> {
        let target = self.target();
        let model = EmitModel::build(ir, stem, target.case(), MODULE_NAMES)?;
        let source = templates::render(&self.env, MODULE_TEMPLATE, &model, target.as_str())?;
        Ok(Artifact::File(source))
    }
}
