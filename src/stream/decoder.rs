// Copyright 2026 Logsieve Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Protocol decoding: preamble, tag bytes, and IR unit bodies
//!
//! Every decoder consumes exactly the bytes of its field and fails with
//! Truncated on premature EOF or Corrupt on self-inconsistent content.
//! After a failure the reader's position is unspecified and the stream
//! must be abandoned.

use crate::core::value::EncodedTextAst;
use crate::core::{Error, Namespace, NodeId, NodeLocator, Result, UtcOffset, Value};
use crate::stream::event::NodeValueMap;
use crate::stream::protocol::{
    EncodingType, LengthWidth, LogEventTag, SchemaNodeTag, EIGHT_BYTE_ENCODING_TAG,
    FOUR_BYTE_ENCODING_TAG, METADATA_JSON_TAG, VALUE_TAG_ARRAY_LEN_U16, VALUE_TAG_ARRAY_LEN_U32,
    VALUE_TAG_ARRAY_LEN_U8, VALUE_TAG_ENCODED_TEXT, VALUE_TAG_FALSE, VALUE_TAG_FLOAT64,
    VALUE_TAG_INT32, VALUE_TAG_INT64, VALUE_TAG_INT8, VALUE_TAG_NULL, VALUE_TAG_STR_LEN_U16,
    VALUE_TAG_STR_LEN_U32, VALUE_TAG_STR_LEN_U8, VALUE_TAG_TRUE,
};
use crate::stream::reader::Reader;

/// Read the encoding-variant indicator that opens every stream
pub fn get_encoding_type<R: Reader>(reader: &mut R) -> Result<EncodingType> {
    match read_u8(reader)? {
        FOUR_BYTE_ENCODING_TAG => Ok(EncodingType::FourByte),
        EIGHT_BYTE_ENCODING_TAG => Ok(EncodingType::EightByte),
        tag => Err(Error::corrupt(format!(
            "unrecognized encoding variant tag {:#04x}",
            tag
        ))),
    }
}

/// Read the metadata type tag and the raw metadata blob
pub fn deserialize_preamble<R: Reader>(reader: &mut R) -> Result<Vec<u8>> {
    let metadata_type = read_u8(reader)?;
    if metadata_type != METADATA_JSON_TAG {
        return Err(Error::unsupported_metadata(format!(
            "metadata type tag {:#04x} is not JSON",
            metadata_type
        )));
    }
    let length = read_u32_le(reader)? as usize;
    read_bytes(reader, length)
}

/// Read the next unit's tag byte
pub fn deserialize_tag<R: Reader>(reader: &mut R) -> Result<u8> {
    read_u8(reader)
}

/// Decode a schema-tree-node-insertion unit body
pub fn deserialize_ir_unit_schema_tree_node_insertion<R: Reader>(
    reader: &mut R,
    tag: u8,
) -> Result<(Namespace, NodeLocator)> {
    let tag = SchemaNodeTag::decode(tag)?;
    let parent_id = read_u32_le(reader)?;
    let key_length = read_length(reader, tag.key_length_width)?;
    let key_name = read_string(reader, key_length)?;
    Ok((
        tag.namespace,
        NodeLocator::new(parent_id, key_name, tag.node_type),
    ))
}

/// Decode a UTC offset change unit body
pub fn deserialize_ir_unit_utc_offset_change<R: Reader>(reader: &mut R) -> Result<UtcOffset> {
    read_i64_le(reader)
}

/// Decode a log event's (auto_gen, user_gen) node-id/value pair maps
pub fn deserialize_ir_unit_log_event<R: Reader>(
    reader: &mut R,
    tag: u8,
    encoding: EncodingType,
) -> Result<(NodeValueMap, NodeValueMap)> {
    let tag = LogEventTag::decode(tag)?;
    let auto_gen_pairs = read_pair_map(reader, tag.field_width, encoding)?;
    let user_gen_pairs = read_pair_map(reader, tag.field_width, encoding)?;
    Ok((auto_gen_pairs, user_gen_pairs))
}

fn read_pair_map<R: Reader>(
    reader: &mut R,
    field_width: LengthWidth,
    encoding: EncodingType,
) -> Result<NodeValueMap> {
    let pair_count = read_length(reader, field_width)?;
    let mut pairs = NodeValueMap::new();
    for _ in 0..pair_count {
        let node_id = read_length(reader, field_width)? as NodeId;
        let value = read_value(reader, encoding)?;
        if !pairs.insert(node_id, value) {
            return Err(Error::corrupt(format!(
                "node id {} appears twice in one log event",
                node_id
            )));
        }
    }
    Ok(pairs)
}

fn read_value<R: Reader>(reader: &mut R, encoding: EncodingType) -> Result<Value> {
    let tag = read_u8(reader)?;
    match tag {
        VALUE_TAG_NULL => Ok(Value::Null),
        VALUE_TAG_TRUE => Ok(Value::Bool(true)),
        VALUE_TAG_FALSE => Ok(Value::Bool(false)),
        VALUE_TAG_INT8 => Ok(Value::Int(read_i8(reader)? as i64)),
        VALUE_TAG_INT32 => Ok(Value::Int(read_i32_le(reader)? as i64)),
        VALUE_TAG_INT64 => Ok(Value::Int(read_i64_le(reader)?)),
        VALUE_TAG_FLOAT64 => Ok(Value::Float(read_f64_le(reader)?)),
        VALUE_TAG_STR_LEN_U8 => read_sized_string(reader, LengthWidth::U8).map(Value::ShortString),
        VALUE_TAG_STR_LEN_U16 => {
            read_sized_string(reader, LengthWidth::U16).map(Value::ShortString)
        }
        VALUE_TAG_STR_LEN_U32 => {
            read_sized_string(reader, LengthWidth::U32).map(Value::ShortString)
        }
        VALUE_TAG_ARRAY_LEN_U8 => {
            read_sized_string(reader, LengthWidth::U8).map(Value::UnstructuredArray)
        }
        VALUE_TAG_ARRAY_LEN_U16 => {
            read_sized_string(reader, LengthWidth::U16).map(Value::UnstructuredArray)
        }
        VALUE_TAG_ARRAY_LEN_U32 => {
            read_sized_string(reader, LengthWidth::U32).map(Value::UnstructuredArray)
        }
        VALUE_TAG_ENCODED_TEXT => read_encoded_text(reader, encoding).map(Value::ClpString),
        tag => Err(Error::corrupt(format!("unknown value tag {:#04x}", tag))),
    }
}

fn read_encoded_text<R: Reader>(reader: &mut R, encoding: EncodingType) -> Result<EncodedTextAst> {
    let logtype_length = read_u32_le(reader)? as usize;
    let logtype = read_string(reader, logtype_length)?;

    let dict_var_count = read_u32_le(reader)? as usize;
    let mut dict_vars = Vec::with_capacity(dict_var_count.min(64));
    for _ in 0..dict_var_count {
        let length = read_u32_le(reader)? as usize;
        dict_vars.push(read_string(reader, length)?);
    }

    let encoded_var_count = read_u32_le(reader)? as usize;
    let mut encoded_vars = Vec::with_capacity(encoded_var_count.min(64));
    for _ in 0..encoded_var_count {
        let var = match encoding {
            EncodingType::FourByte => read_i32_le(reader)? as i64,
            EncodingType::EightByte => read_i64_le(reader)?,
        };
        encoded_vars.push(var);
    }

    Ok(EncodedTextAst::new(logtype, dict_vars, encoded_vars))
}

// =========================================================================
// Primitive readers
// =========================================================================

fn read_u8<R: Reader>(reader: &mut R) -> Result<u8> {
    let mut buf = [0u8; 1];
    reader.try_read_exact(&mut buf)?;
    Ok(buf[0])
}

fn read_i8<R: Reader>(reader: &mut R) -> Result<i8> {
    Ok(read_u8(reader)? as i8)
}

fn read_u16_le<R: Reader>(reader: &mut R) -> Result<u16> {
    let mut buf = [0u8; 2];
    reader.try_read_exact(&mut buf)?;
    Ok(u16::from_le_bytes(buf))
}

fn read_u32_le<R: Reader>(reader: &mut R) -> Result<u32> {
    let mut buf = [0u8; 4];
    reader.try_read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

fn read_i32_le<R: Reader>(reader: &mut R) -> Result<i32> {
    let mut buf = [0u8; 4];
    reader.try_read_exact(&mut buf)?;
    Ok(i32::from_le_bytes(buf))
}

fn read_i64_le<R: Reader>(reader: &mut R) -> Result<i64> {
    let mut buf = [0u8; 8];
    reader.try_read_exact(&mut buf)?;
    Ok(i64::from_le_bytes(buf))
}

fn read_f64_le<R: Reader>(reader: &mut R) -> Result<f64> {
    let mut buf = [0u8; 8];
    reader.try_read_exact(&mut buf)?;
    Ok(f64::from_le_bytes(buf))
}

fn read_length<R: Reader>(reader: &mut R, width: LengthWidth) -> Result<usize> {
    match width {
        LengthWidth::U8 => Ok(read_u8(reader)? as usize),
        LengthWidth::U16 => Ok(read_u16_le(reader)? as usize),
        LengthWidth::U32 => Ok(read_u32_le(reader)? as usize),
    }
}

fn read_bytes<R: Reader>(reader: &mut R, length: usize) -> Result<Vec<u8>> {
    let mut buf = vec![0u8; length];
    reader.try_read_exact(&mut buf)?;
    Ok(buf)
}

fn read_string<R: Reader>(reader: &mut R, length: usize) -> Result<String> {
    let bytes = read_bytes(reader, length)?;
    String::from_utf8(bytes).map_err(|_| Error::corrupt("string field is not valid UTF-8"))
}

fn read_sized_string<R: Reader>(
    reader: &mut R,
    width: LengthWidth,
) -> Result<std::sync::Arc<str>> {
    let length = read_length(reader, width)?;
    let text = read_string(reader, length)?;
    Ok(std::sync::Arc::from(text.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::NodeType;
    use crate::stream::reader::SliceReader;

    #[test]
    fn test_encoding_type() {
        let mut reader = SliceReader::new(&[FOUR_BYTE_ENCODING_TAG]);
        assert_eq!(
            get_encoding_type(&mut reader).unwrap(),
            EncodingType::FourByte
        );

        let mut reader = SliceReader::new(&[EIGHT_BYTE_ENCODING_TAG]);
        assert_eq!(
            get_encoding_type(&mut reader).unwrap(),
            EncodingType::EightByte
        );

        let mut reader = SliceReader::new(&[0x99]);
        assert!(matches!(
            get_encoding_type(&mut reader),
            Err(Error::Corrupt(_))
        ));

        let mut reader = SliceReader::new(&[]);
        assert_eq!(get_encoding_type(&mut reader), Err(Error::Truncated));
    }

    #[test]
    fn test_preamble() {
        let metadata = br#"{"version":"0.1.0"}"#;
        let mut bytes = vec![METADATA_JSON_TAG];
        bytes.extend_from_slice(&(metadata.len() as u32).to_le_bytes());
        bytes.extend_from_slice(metadata);
        let mut reader = SliceReader::new(&bytes);
        assert_eq!(deserialize_preamble(&mut reader).unwrap(), metadata);

        // Wrong metadata type tag
        let mut reader = SliceReader::new(&[0x07, 0, 0, 0, 0]);
        assert!(matches!(
            deserialize_preamble(&mut reader),
            Err(Error::UnsupportedMetadata(_))
        ));

        // Declared length exceeds the stream
        let mut bytes = vec![METADATA_JSON_TAG];
        bytes.extend_from_slice(&100u32.to_le_bytes());
        bytes.extend_from_slice(b"short");
        let mut reader = SliceReader::new(&bytes);
        assert_eq!(deserialize_preamble(&mut reader), Err(Error::Truncated));
    }

    #[test]
    fn test_schema_node_insertion_body() {
        let tag = SchemaNodeTag {
            namespace: Namespace::UserGen,
            node_type: NodeType::Int,
            key_length_width: LengthWidth::U8,
        }
        .encode();
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.push(5);
        bytes.extend_from_slice(b"level");
        let mut reader = SliceReader::new(&bytes);
        let (namespace, locator) =
            deserialize_ir_unit_schema_tree_node_insertion(&mut reader, tag).unwrap();
        assert_eq!(namespace, Namespace::UserGen);
        assert_eq!(locator.parent_id, 0);
        assert_eq!(locator.key_name, "level");
        assert_eq!(locator.node_type, NodeType::Int);
    }

    #[test]
    fn test_schema_node_insertion_rejects_bad_utf8() {
        let tag = SchemaNodeTag {
            namespace: Namespace::UserGen,
            node_type: NodeType::Str,
            key_length_width: LengthWidth::U8,
        }
        .encode();
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.push(2);
        bytes.extend_from_slice(&[0xFF, 0xFE]);
        let mut reader = SliceReader::new(&bytes);
        assert!(matches!(
            deserialize_ir_unit_schema_tree_node_insertion(&mut reader, tag),
            Err(Error::Corrupt(_))
        ));
    }

    #[test]
    fn test_utc_offset_body() {
        let bytes = (-7_200_000_000_000i64).to_le_bytes();
        let mut reader = SliceReader::new(&bytes);
        assert_eq!(
            deserialize_ir_unit_utc_offset_change(&mut reader).unwrap(),
            -7_200_000_000_000
        );
    }

    #[test]
    fn test_log_event_body() {
        let tag = LogEventTag {
            field_width: LengthWidth::U8,
        }
        .encode();
        let mut bytes = Vec::new();
        // auto-gen: one pair (id 1, int64 99)
        bytes.push(1);
        bytes.push(1);
        bytes.push(VALUE_TAG_INT64);
        bytes.extend_from_slice(&99i64.to_le_bytes());
        // user-gen: two pairs (id 1, "hi") and (id 2, true)
        bytes.push(2);
        bytes.push(1);
        bytes.push(VALUE_TAG_STR_LEN_U8);
        bytes.push(2);
        bytes.extend_from_slice(b"hi");
        bytes.push(2);
        bytes.push(VALUE_TAG_TRUE);

        let mut reader = SliceReader::new(&bytes);
        let (auto_gen, user_gen) =
            deserialize_ir_unit_log_event(&mut reader, tag, EncodingType::EightByte).unwrap();
        assert_eq!(auto_gen.len(), 1);
        assert_eq!(auto_gen.get(1), Some(&Value::Int(99)));
        assert_eq!(user_gen.len(), 2);
        assert_eq!(user_gen.get(1), Some(&Value::short_string("hi")));
        assert_eq!(user_gen.get(2), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_log_event_rejects_duplicate_node_id() {
        let tag = LogEventTag {
            field_width: LengthWidth::U8,
        }
        .encode();
        let mut bytes = Vec::new();
        bytes.push(2);
        bytes.push(1);
        bytes.push(VALUE_TAG_NULL);
        bytes.push(1);
        bytes.push(VALUE_TAG_NULL);
        bytes.push(0);

        let mut reader = SliceReader::new(&bytes);
        assert!(matches!(
            deserialize_ir_unit_log_event(&mut reader, tag, EncodingType::EightByte),
            Err(Error::Corrupt(_))
        ));
    }

    #[test]
    fn test_log_event_rejects_unknown_value_tag() {
        let tag = LogEventTag {
            field_width: LengthWidth::U8,
        }
        .encode();
        let bytes = [1u8, 1, 0x7E];
        let mut reader = SliceReader::new(&bytes);
        assert!(matches!(
            deserialize_ir_unit_log_event(&mut reader, tag, EncodingType::EightByte),
            Err(Error::Corrupt(_))
        ));
    }

    #[test]
    fn test_int_width_variants_sign_extend() {
        let tag = LogEventTag {
            field_width: LengthWidth::U8,
        }
        .encode();
        let mut bytes = Vec::new();
        bytes.push(2);
        bytes.push(1);
        bytes.push(VALUE_TAG_INT8);
        bytes.push((-5i8) as u8);
        bytes.push(2);
        bytes.push(VALUE_TAG_INT32);
        bytes.extend_from_slice(&(-70_000i32).to_le_bytes());
        bytes.push(0);

        let mut reader = SliceReader::new(&bytes);
        let (auto_gen, _) =
            deserialize_ir_unit_log_event(&mut reader, tag, EncodingType::EightByte).unwrap();
        assert_eq!(auto_gen.get(1), Some(&Value::Int(-5)));
        assert_eq!(auto_gen.get(2), Some(&Value::Int(-70_000)));
    }

    #[test]
    fn test_encoded_text_value_four_and_eight_byte() {
        use crate::core::value::INT_VAR_PLACEHOLDER;
        let logtype = format!("n={}", INT_VAR_PLACEHOLDER);

        let mut body = Vec::new();
        body.extend_from_slice(&(logtype.len() as u32).to_le_bytes());
        body.extend_from_slice(logtype.as_bytes());
        body.extend_from_slice(&1u32.to_le_bytes()); // one dict var
        body.extend_from_slice(&3u32.to_le_bytes());
        body.extend_from_slice(b"abc");
        body.extend_from_slice(&1u32.to_le_bytes()); // one encoded var

        let mut four = body.clone();
        four.extend_from_slice(&42i32.to_le_bytes());
        let mut reader = SliceReader::new(&four);
        let ast = read_encoded_text(&mut reader, EncodingType::FourByte).unwrap();
        assert_eq!(ast.encoded_vars(), &[42]);
        assert_eq!(ast.dict_vars(), &["abc".to_string()]);
        assert_eq!(ast.decode(), "n=42");

        let mut eight = body;
        eight.extend_from_slice(&42i64.to_le_bytes());
        let mut reader = SliceReader::new(&eight);
        let ast = read_encoded_text(&mut reader, EncodingType::EightByte).unwrap();
        assert_eq!(ast.decode(), "n=42");
    }

    #[test]
    fn test_truncated_value_body() {
        let tag = LogEventTag {
            field_width: LengthWidth::U8,
        }
        .encode();
        // Declares one pair but the int64 payload is cut short
        let bytes = [1u8, 1, VALUE_TAG_INT64, 0x01, 0x02];
        let mut reader = SliceReader::new(&bytes);
        assert_eq!(
            deserialize_ir_unit_log_event(&mut reader, tag, EncodingType::EightByte),
            Err(Error::Truncated)
        );
    }
}
