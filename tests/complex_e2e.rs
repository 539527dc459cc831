//! Nested vector and address arguments through a dev-inspect round trip.

mod common;

use common::*;
use sui_bind_types::CallArg;
use sui_move_bind::{CallValue, MoveValue};

fn address_bytes(hex: &str) -> Vec<u8> {
    addr(hex).to_vec()
}

fn address_list(items: &[&str]) -> CallValue {
    MoveValue::Vector(items.iter().map(|s| MoveValue::Address(s.to_string())).collect()).into()
}

#[test]
fn test_flatten_address() {
    let chain = chain();
    let complex = contract(&chain, "complex");
    let encoded = assert_ok(
        complex.encode_call_args_with_return_types(
            "flatten_address",
            &[],
            &strings(&["address", "vector<address>"]),
            vec![
                CallValue::from("0x11234"),
                address_list(&["0x11234", "0x21234", "0x31234"]),
            ],
            strings(&["vector<address>"]),
        ),
        "encode flatten_address",
    );

    let mut expected_list = vec![3u8];
    for hex in ["0x11234", "0x21234", "0x31234"] {
        expected_list.extend(address_bytes(hex));
    }
    let pure_bytes: Vec<Vec<u8>> = encoded
        .call_args
        .iter()
        .map(|arg| match &arg.value {
            sui_move_bind::EncodedArgValue::CallArg(CallArg::Pure(bytes)) => bytes.clone(),
            other => panic!("expected a pure argument, got {:?}", other),
        })
        .collect();
    assert_eq!(pure_bytes[0], address_bytes("0x11234"));
    assert_eq!(pure_bytes[1], expected_list);

    let values = assert_ok(complex.call(&call_opts(), &encoded), "dev inspect flatten_address");

    let mut expected_return = vec![4u8];
    for hex in ["0x11234", "0x11234", "0x21234", "0x31234"] {
        expected_return.extend(address_bytes(hex));
    }
    assert_eq!(chain.recorded().last_results[0][0].0, expected_return);

    assert_eq!(
        values,
        vec![MoveValue::Vector(vec![
            MoveValue::Address(id("0x11234")),
            MoveValue::Address(id("0x11234")),
            MoveValue::Address(id("0x21234")),
            MoveValue::Address(id("0x31234")),
        ])]
    );
}

#[test]
fn test_flatten_nested_bytes() {
    let chain = chain();
    let complex = contract(&chain, "complex");
    let nested = MoveValue::Vector(vec![
        MoveValue::Bytes(vec![1, 2]),
        MoveValue::Bytes(vec![]),
        MoveValue::Bytes(vec![3]),
    ]);
    let encoded = complex
        .encode_call_args_with_return_types(
            "flatten_u8",
            &[],
            &strings(&["vector<vector<u8>>"]),
            vec![nested.into()],
            strings(&["vector<u8>"]),
        )
        .unwrap();

    let values = complex.call(&call_opts(), &encoded).unwrap();
    assert_eq!(values, vec![MoveValue::Bytes(vec![1, 2, 3])]);

    let recorded = chain.recorded();
    assert_eq!(recorded.dev_inspected.len(), 1);
    assert_eq!(recorded.dev_inspected[0].inputs, vec![CallArg::Pure(vec![3, 2, 1, 2, 0, 1, 3])]);
    assert_eq!(recorded.dev_inspect_gas_prices, vec![None]);
}

#[test]
fn test_wrong_value_kind_is_rejected_with_parameter_index() {
    let chain = chain();
    let complex = contract(&chain, "complex");
    let err = complex
        .encode_call_args(
            "flatten_address",
            &[],
            &strings(&["address", "vector<address>"]),
            vec![CallValue::from("0x1"), CallValue::from(true)],
        )
        .unwrap_err();
    assert_error_contains(&err, "parameter 1", "bad element");
    assert!(chain.recorded().dev_inspected.is_empty());
}

#[test]
fn test_parameter_count_mismatch() {
    let chain = chain();
    let complex = contract(&chain, "complex");
    let err = complex
        .encode_call_args(
            "flatten_address",
            &[],
            &strings(&["address", "vector<address>"]),
            vec![CallValue::from("0x1")],
        )
        .unwrap_err();
    assert_error_contains(&err, "same length", "arity");
}
