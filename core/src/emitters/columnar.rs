//! Parquet row-group writer.
//!
//! One arrow column builder per canonical field. Rows accumulate in the
//! builders until `ROW_GROUP_SIZE` is reached, then one record batch is
//! written and the row group flushed.

use super::{
    field_ident, rust_file_name, uses_type, ArtifactEmitter, ArtifactKind, GENERATED_HEADER,
};
use crate::error::{AppError, AppResult};
use crate::model::{CanonicalFieldDescriptor, CanonicalFieldModel};
use crate::naming::file_stem;
use crate::type_mapping::{TargetType, TEXT_COLUMN_LENGTH};

/// Days from 0001-01-01 (CE day 1) to the Unix epoch, for `Date32` columns.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Emits `<entity>_parquet_writer.rs`.
#[derive(Debug, Clone, Copy)]
pub struct ColumnarWriterEmitter {
    row_group_size: usize,
}

impl ColumnarWriterEmitter {
    /// Creates an emitter flushing every `row_group_size` rows.
    pub fn new(row_group_size: usize) -> Self {
        Self { row_group_size }
    }
}

/// Arrow binding for one canonical field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnBinding {
    /// Column name in the parquet schema (the refined name).
    pub column: String,
    /// Builder type holding the column.
    pub builder: &'static str,
    /// Arrow `DataType` expression.
    pub data_type: &'static str,
    /// Expression creating the builder sized for one row group.
    pub constructor: String,
    /// Statement appending `item.<field>` to the builder.
    pub append: String,
    /// Expression finishing the builder into an `ArrayRef`.
    pub finish: String,
}

/// Derives the arrow binding of one field.
pub fn column_binding(field: &CanonicalFieldDescriptor) -> AppResult<ColumnBinding> {
    let ident = field_ident(field);
    let nullable = field.is_nullable() && !field.target_type().is_string_like();

    let (builder, data_type) = match field.target_type() {
        TargetType::String | TargetType::Id => ("StringBuilder", "DataType::Utf8"),
        TargetType::Boolean => ("BooleanBuilder", "DataType::Boolean"),
        TargetType::Integer => ("Int32Builder", "DataType::Int32"),
        TargetType::Long => ("Int64Builder", "DataType::Int64"),
        TargetType::Decimal => ("Float64Builder", "DataType::Float64"),
        TargetType::DateTime => (
            "TimestampMillisecondBuilder",
            "DataType::Timestamp(TimeUnit::Millisecond, Some(\"UTC\".into()))",
        ),
        TargetType::Date => ("Date32Builder", "DataType::Date32"),
        TargetType::Unknown => {
            return Err(AppError::InvalidArgument(format!(
                "field {} has no columnar type",
                field.source_name()
            )))
        }
    };

    let value = match (field.target_type(), nullable) {
        (TargetType::String | TargetType::Id, _) => format!("&item.{}", ident),
        (TargetType::DateTime, true) => format!("item.{}.map(|v| v.timestamp_millis())", ident),
        (TargetType::DateTime, false) => format!("item.{}.timestamp_millis()", ident),
        (TargetType::Date, true) => format!(
            "item.{}.map(|v| v.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE)",
            ident
        ),
        (TargetType::Date, false) => {
            format!("item.{}.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE", ident)
        }
        _ => format!("item.{}", ident),
    };
    // Variable-width builders also reserve their value buffer.
    let constructor = if field.target_type().is_string_like() {
        format!(
            "{}::with_capacity(ROW_GROUP_SIZE, ROW_GROUP_SIZE * {})",
            builder, TEXT_COLUMN_LENGTH
        )
    } else {
        format!("{}::with_capacity(ROW_GROUP_SIZE)", builder)
    };
    let method = if nullable { "append_option" } else { "append_value" };
    let finish = match field.target_type() {
        TargetType::DateTime => format!("Arc::new(self.{}.finish().with_timezone(\"UTC\"))", ident),
        _ => format!("Arc::new(self.{}.finish())", ident),
    };

    Ok(ColumnBinding {
        column: field.refined_name().to_string(),
        builder,
        data_type,
        constructor,
        append: format!("self.{}.{}({});", ident, method, value),
        finish,
    })
}

impl ArtifactEmitter for ColumnarWriterEmitter {
    fn kind(&self) -> ArtifactKind {
        ArtifactKind::ColumnarWriter
    }

    fn file_name(&self, entity: &str) -> String {
        rust_file_name(entity, "ParquetWriter")
    }

    fn emit(&self, entity: &str, model: &CanonicalFieldModel) -> AppResult<String> {
        let bindings = model
            .iter()
            .map(column_binding)
            .collect::<AppResult<Vec<_>>>()?;
        let idents: Vec<String> = model.iter().map(field_ident).collect();
        let writer = format!("{}ParquetWriter", entity);

        let mut builders: Vec<&str> = bindings.iter().map(|b| b.builder).collect();
        builders.sort_unstable();
        builders.dedup();

        let mut code = String::new();
        code.push_str(GENERATED_HEADER);
        code.push_str("\n#![allow(non_snake_case)]\n\n");
        code.push_str("use std::io::Write;\n");
        code.push_str("use std::sync::Arc;\n\n");
        code.push_str(&format!(
            "use arrow_array::builder::{{{}}};\n",
            builders.join(", ")
        ));
        code.push_str("use arrow_array::{ArrayRef, RecordBatch};\n");
        code.push_str("use arrow_schema::{DataType, Field, Schema, SchemaRef, TimeUnit};\n");
        code.push_str("use parquet::arrow::ArrowWriter;\n");
        code.push_str("use parquet::errors::ParquetError;\n\n");
        let has_date = uses_type(model, TargetType::Date);
        if has_date {
            code.push_str("use chrono::Datelike;\n\n");
        }
        code.push_str(&format!("use super::{}::{};\n\n", file_stem(entity), entity));

        if has_date {
            code.push_str(&format!(
                "const UNIX_EPOCH_DAYS_FROM_CE: i32 = {};\n\n",
                UNIX_EPOCH_DAYS_FROM_CE
            ));
        }
        code.push_str("/// Rows buffered before a row group is written.\n");
        code.push_str(&format!(
            "pub const ROW_GROUP_SIZE: usize = {};\n\n",
            self.row_group_size
        ));

        code.push_str(&format!("/// Parquet schema of `{}`.\n", entity));
        code.push_str("pub fn schema() -> SchemaRef {\n");
        code.push_str("    Arc::new(Schema::new(vec![\n");
        for binding in &bindings {
            code.push_str(&format!(
                "        Field::new(\"{}\", {}, true),\n",
                binding.column, binding.data_type
            ));
        }
        code.push_str("    ]))\n");
        code.push_str("}\n\n");

        code.push_str(&format!("/// Writes `{}` rows as parquet row groups.\n", entity));
        code.push_str(&format!("pub struct {}<W: Write + Send> {{\n", writer));
        code.push_str("    writer: ArrowWriter<W>,\n");
        code.push_str("    rows: usize,\n");
        for (ident, binding) in idents.iter().zip(&bindings) {
            code.push_str(&format!("    {}: {},\n", ident, binding.builder));
        }
        code.push_str("}\n\n");

        code.push_str(&format!("impl<W: Write + Send> {}<W> {{\n", writer));
        code.push_str("    pub fn try_new(output: W) -> Result<Self, ParquetError> {\n");
        code.push_str("        Ok(Self {\n");
        code.push_str("            writer: ArrowWriter::try_new(output, schema(), None)?,\n");
        code.push_str("            rows: 0,\n");
        for (ident, binding) in idents.iter().zip(&bindings) {
            code.push_str(&format!("            {}: {},\n", ident, binding.constructor));
        }
        code.push_str("        })\n");
        code.push_str("    }\n\n");

        code.push_str("    pub fn has_cache(&self) -> bool {\n");
        code.push_str("        self.rows > 0\n");
        code.push_str("    }\n\n");
        code.push_str("    pub fn should_flush_cache(&self) -> bool {\n");
        code.push_str("        self.rows >= ROW_GROUP_SIZE\n");
        code.push_str("    }\n\n");

        code.push_str(&format!(
            "    pub fn write_item(&mut self, item: &{}) -> Result<(), ParquetError> {{\n",
            entity
        ));
        for binding in &bindings {
            code.push_str(&format!("        {}\n", binding.append));
        }
        code.push_str("        self.rows += 1;\n");
        code.push_str("        if self.should_flush_cache() {\n");
        code.push_str("            self.flush_cache()?;\n");
        code.push_str("        }\n");
        code.push_str("        Ok(())\n");
        code.push_str("    }\n\n");

        code.push_str("    /// Writes buffered rows as one row group.\n");
        code.push_str("    pub fn flush_cache(&mut self) -> Result<(), ParquetError> {\n");
        code.push_str("        if !self.has_cache() {\n");
        code.push_str("            return Ok(());\n");
        code.push_str("        }\n");
        code.push_str("        let columns: Vec<ArrayRef> = vec![\n");
        for binding in &bindings {
            code.push_str(&format!("            {},\n", binding.finish));
        }
        code.push_str("        ];\n");
        code.push_str("        let batch = RecordBatch::try_new(schema(), columns)?;\n");
        code.push_str("        self.writer.write(&batch)?;\n");
        code.push_str("        self.writer.flush()?;\n");
        code.push_str("        self.rows = 0;\n");
        code.push_str("        Ok(())\n");
        code.push_str("    }\n\n");

        code.push_str("    /// Flushes remaining rows and finalizes the file footer.\n");
        code.push_str("    pub fn close(mut self) -> Result<(), ParquetError> {\n");
        code.push_str("        self.flush_cache()?;\n");
        code.push_str("        self.writer.close()?;\n");
        code.push_str("        Ok(())\n");
        code.push_str("    }\n");
        code.push_str("}\n");

        Ok(code)
    }
}
