use crate::metadata::{DataAttribute, MethodInfo};
use crate::provider::DataProvider;
use crate::value::DataRow;
use crate::TheoryError;

/// Yields the attribute's own arguments as a single row.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineDataProvider;

impl DataProvider for InlineDataProvider {
    fn get_data(
        &self,
        attribute: &DataAttribute,
        _method: &MethodInfo,
    ) -> Result<Vec<DataRow>, TheoryError> {
        Ok(vec![attribute.args.clone()])
    }
}
