//! Rows read from a JSON table: `[[1, "a"], [2, "b"]]` yields two rows.

use crate::metadata::{DataAttribute, MethodInfo};
use crate::provider::DataProvider;
use crate::value::{DataRow, Value};
use crate::{err_ctx, err_msg, TheoryError};

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonDataProvider;

impl DataProvider for JsonDataProvider {
    fn get_data(
        &self,
        attribute: &DataAttribute,
        method: &MethodInfo,
    ) -> Result<Vec<DataRow>, TheoryError> {
        let Some(table) = attribute.args.first().and_then(Value::as_str) else {
            return Err(err_ctx!(
                Provider,
                format!("'{}' expects a JSON table as its first argument", attribute.name),
                method.name,
                "pass a string such as \"[[1, 2], [3, 4]]\""
            ));
        };

        let parsed: Vec<Value> = serde_json::from_str(table).map_err(|e| {
            err_msg!(Provider, "'{}' holds invalid JSON", attribute.name).with_source(e)
        })?;

        parsed
            .into_iter()
            .enumerate()
            .map(|(index, row)| match row {
                Value::List(items) => Ok(items),
                other => Err(err_msg!(
                    Provider,
                    "row {} of '{}' is {}, expected an array",
                    index,
                    attribute.name,
                    other.type_name()
                )),
            })
            .collect()
    }
}
