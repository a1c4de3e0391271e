use cport_types::TypeEnv;

/// Lowering context for one translation run.
///
/// Every operation is a pure function of its inputs and the environment;
/// the context only carries the environment reference.
#[derive(Clone, Copy)]
pub struct Lower<'env> {
    env: &'env TypeEnv,
}

impl<'env> Lower<'env> {
    pub fn new(env: &'env TypeEnv) -> Self {
        Self { env }
    }

    pub fn env(&self) -> &'env TypeEnv {
        self.env
    }
}
