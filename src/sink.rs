use crate::data::GeneratedClass;
use crate::error::PersistenceError;
use log::warn;

/// External persistence boundary: one "create class" operation per record.
pub trait ClassSink {
    fn create_class(&mut self, class: &GeneratedClass) -> Result<(), PersistenceError>;
}

/// Collects created classes in memory. Useful for tests and local runs.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub created: Vec<GeneratedClass>,
}

impl ClassSink for MemorySink {
    fn create_class(&mut self, class: &GeneratedClass) -> Result<(), PersistenceError> {
        self.created.push(class.clone());
        Ok(())
    }
}

/// Hands each class to the sink; a failure is recorded per class and the
/// remaining classes are still persisted.
pub fn persist_all(
    sink: &mut dyn ClassSink,
    classes: &[GeneratedClass],
    errors: &mut Vec<String>,
) {
    for class in classes {
        if let Err(e) = sink.create_class(class) {
            warn!("{}", e);
            errors.push(e.to_string());
        }
    }
}
