//! Hand-built PTBs, method bundles and direct object reads.

mod common;

use std::str::FromStr;

use common::*;
use move_core_types::identifier::Identifier;
use sui_bind_types::{Argument, CallArg, Command, ObjectArg, ProgrammableMoveCall};
use sui_move_bind::codec::decode_dev_inspect_results;
use sui_move_bind::{
    get_object_ref, object_field_value, read_object, Codec, Method, MoveValue, PtbBuilder,
};

fn counter_call(function: &str, arguments: Vec<Argument>) -> ProgrammableMoveCall {
    ProgrammableMoveCall {
        package: addr(PACKAGE_ID),
        module: Identifier::from_str("counter").unwrap(),
        function: Identifier::from_str(function).unwrap(),
        type_arguments: vec![],
        arguments,
    }
}

fn shared_counter(mutable: bool) -> CallArg {
    CallArg::Object(ObjectArg::SharedObject {
        id: addr(COUNTER_ID),
        initial_shared_version: COUNTER_INITIAL_SHARED_VERSION,
        mutable,
    })
}

fn add_method(amount: u64) -> Method {
    Method::from_build(move || {
        let mut builder = PtbBuilder::new();
        let counter = builder.input(shared_counter(true))?;
        let amount = builder.pure(&amount)?;
        builder.move_call(counter_call("add", vec![counter, amount]))?;
        builder.finish()
    })
}

#[test]
fn test_method_execute_and_inspect() {
    let chain = chain();
    let method = add_method(5);

    let pt = method.build().unwrap();
    assert_eq!(pt.inputs.len(), 2);
    assert_eq!(pt.inputs[1], CallArg::Pure(5u64.to_le_bytes().to_vec()));

    let inspected = method.inspect(chain.as_ref(), &call_opts()).unwrap();
    assert_eq!(inspected.effects.status.status, "success");
    assert_eq!(chain.counter(), 0);

    method.execute(chain.as_ref(), &call_opts()).unwrap();
    method.execute(chain.as_ref(), &call_opts()).unwrap();
    assert_eq!(chain.counter(), 10);
    assert_eq!(chain.recorded().executed.len(), 2);
}

#[test]
fn test_inspect_returns_raw_results() {
    let chain = chain();
    let method = Method::from_build(|| {
        let mut builder = PtbBuilder::new();
        let counter = builder.input(shared_counter(false))?;
        builder.move_call(counter_call("get_count", vec![counter]))?;
        builder.finish()
    });
    add_method(42).execute(chain.as_ref(), &call_opts()).unwrap();

    let inspected = method.inspect(chain.as_ref(), &call_opts()).unwrap();
    let results = inspected.results.expect("results");
    let values =
        decode_dev_inspect_results(&Codec::new(), &results, &strings(&["u64"]), None).unwrap();
    assert_eq!(values, vec![MoveValue::U64(42)]);
}

#[test]
fn test_builder_commands_index_results() {
    let mut builder = PtbBuilder::new();
    let amount = builder.pure(&1_000u64).unwrap();
    let split = builder.split_coins(Argument::GasCoin, vec![amount]).unwrap();
    assert_eq!(split, Argument::Result(0));
    let recipient = builder.pure(&addr(SENDER)).unwrap();
    let transfer = builder
        .transfer_objects(vec![Argument::NestedResult(0, 0)], recipient)
        .unwrap();
    assert_eq!(transfer, Argument::Result(1));

    let pt = builder.finish().unwrap();
    assert_eq!(pt.commands.len(), 2);
    assert!(matches!(pt.commands[0], Command::SplitCoins(Argument::GasCoin, _)));
    assert_eq!(
        pt.inputs,
        vec![
            CallArg::Pure(1_000u64.to_le_bytes().to_vec()),
            CallArg::Pure(addr(SENDER).to_vec()),
        ]
    );

    let chain = chain();
    sui_move_bind::execute_ptb(chain.as_ref(), &call_opts(), pt).unwrap();
}

#[test]
fn test_unresolved_inputs_block_finish() {
    let mut builder = PtbBuilder::new();
    builder
        .input(CallArg::UnresolvedObject(addr(COUNTER_ID)))
        .unwrap();
    let err = builder.finish().unwrap_err();
    assert_error_contains(&err, "input 0", "unresolved");
}

#[test]
fn test_read_object_and_fields() {
    let chain = chain();
    add_method(7).execute(chain.as_ref(), &call_opts()).unwrap();

    let response = read_object(chain.as_ref(), COUNTER_ID).unwrap();
    let value: String = object_field_value(&response, "value").unwrap();
    assert_eq!(value, "7");
    let err = object_field_value::<String>(&response, "missing").unwrap_err();
    assert_error_contains(&err, "'missing'", "absent field");

    // one successful transaction bumps the version from 10
    let object_ref = get_object_ref(chain.as_ref(), COUNTER_ID).unwrap();
    assert_eq!(object_ref.object_id, addr(COUNTER_ID));
    assert_eq!(object_ref.version, 11);

    let ticket = get_object_ref(chain.as_ref(), TICKET_ID).unwrap();
    assert_eq!(ticket.version, 4);

    let err = get_object_ref(chain.as_ref(), "0xdead").unwrap_err();
    assert_error_contains(&err, "failed to read object 0xdead", "missing object");
}
