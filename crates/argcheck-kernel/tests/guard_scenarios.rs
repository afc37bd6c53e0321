//! Integration tests: guarded operations exercised the way callers use them.
//!
//! Each test registers one or more operations with `accepted_types` /
//! `accepted_values` and checks which calls pass and which are rejected,
//! including the error family of every rejection.

use argcheck_kernel::{
    Call, CheckError, Consistency, ErrorKind, Function, Kind, Operation, Signature,
    TypeGuardOptions, TypeSpec, Value, ValueGuardOptions, ValueSpec, accepted_types,
    accepted_values,
};
use ndarray::{ArrayD, IxDyn};

fn unary(name: &str) -> Signature {
    Signature::new(name).param("input1")
}

fn typed(sig: Signature, specs: Vec<TypeSpec>, enabled: bool) -> impl Operation<Output = ()> {
    accepted_types(
        Function::new(sig, |_| ()),
        specs,
        TypeGuardOptions {
            types_check_enabled: enabled,
            object_consistency_check: false,
        },
    )
}

fn valued(sig: Signature, specs: Vec<ValueSpec>, enabled: bool) -> impl Operation<Output = ()> {
    accepted_values(
        Function::new(sig, |_| ()),
        specs,
        ValueGuardOptions {
            value_check_enabled: enabled,
        },
    )
}

fn kind_of(result: Result<(), CheckError>) -> Option<ErrorKind> {
    result.err().map(|e| e.kind())
}

fn ones(shape: &[usize]) -> Value {
    Value::Array(ArrayD::ones(IxDyn(shape)))
}

fn array(values: &[f64]) -> Value {
    Value::Array(ArrayD::from_shape_vec(IxDyn(&[values.len()]), values.to_vec()).unwrap())
}

fn ints(values: &[i64]) -> Value {
    Value::List(values.iter().copied().map(Value::Int).collect())
}

#[test]
fn types_number() {
    let number = || TypeSpec::any_of([Kind::Int, Kind::Float]);
    let pair = Signature::new("func").param("input1").param("input2");
    let func = typed(pair.clone(), vec![number(), number()], true);
    let func2 = typed(pair, vec![number(), number()], false);

    assert!(func.invoke(Call::new().arg(1).arg(1.0)).is_ok());
    for bad in [
        Call::new().arg("some text").arg(1),
        Call::new().arg(2.0).arg(Value::List(vec![])),
        Call::new().arg(2).arg(Value::tuple([])),
        Call::new().arg(2).arg(true),
    ] {
        assert_eq!(kind_of(func.invoke(bad)), Some(ErrorKind::TypeKind));
    }
    assert!(func2.invoke(Call::new().arg("some text").arg(Value::tuple([]))).is_ok());

    let defaults = Signature::new("func3")
        .param("input1")
        .param_with_default("input2", 2.0)
        .param_with_default("input3", 3.0);
    let func3 = typed(
        defaults,
        vec![
            TypeSpec::exact(Kind::Int),
            TypeSpec::exact(Kind::Float),
            TypeSpec::exact(Kind::Float),
        ],
        true,
    );
    assert!(func3.invoke(Call::new().arg(1)).is_ok());
    assert!(func3.invoke(Call::new().arg(1).kwarg("input2", 5.0)).is_ok());
    assert!(
        func3
            .invoke(Call::new().arg(1).kwarg("input2", 5.0).kwarg("input3", 10.0))
            .is_ok()
    );
    assert!(func3.invoke(Call::new().arg(1).kwarg("input3", 10.0)).is_ok());
    assert!(
        func3
            .invoke(Call::new().kwarg("input3", 2.0).kwarg("input1", 1))
            .is_ok()
    );
    assert_eq!(
        kind_of(func3.invoke(Call::new())),
        Some(ErrorKind::Configuration)
    );
    assert_eq!(
        kind_of(func3.invoke(Call::new().kwarg("input1", 1.0).kwarg("input3", 2))),
        Some(ErrorKind::TypeKind)
    );

    // An integer default fails a float specification.
    let int_default = Signature::new("func4")
        .param("input1")
        .param_with_default("input2", 2)
        .param_with_default("input3", 3.0);
    let func4 = typed(int_default, vec![TypeSpec::exact(Kind::Float); 3], true);
    assert_eq!(
        kind_of(func4.invoke(Call::new().kwarg("input1", 1.0))),
        Some(ErrorKind::TypeKind)
    );
}

#[test]
fn types_string() {
    let func = typed(unary("func"), vec![TypeSpec::exact(Kind::Str)], true);
    let func2 = typed(unary("func2"), vec![TypeSpec::exact(Kind::Str)], false);

    assert!(func.invoke(Call::new().arg("some text")).is_ok());
    for bad in [
        Value::from(1),
        Value::List(vec![]),
        Value::tuple([]),
        Value::from(true),
    ] {
        assert_eq!(
            kind_of(func.invoke(Call::new().arg(bad))),
            Some(ErrorKind::TypeKind)
        );
    }
    assert!(func2.invoke(Call::new().arg(Value::tuple([]))).is_ok());
}

#[test]
fn types_object_with_consistency() {
    let objects = || TypeSpec::any_of([Kind::List, Kind::Tuple, Kind::Dict]);
    let func = typed(unary("func"), vec![objects()], true);
    assert!(func.invoke(Call::new().arg(Value::List(vec![]))).is_ok());
    assert!(func.invoke(Call::new().arg(Value::tuple([]))).is_ok());
    assert!(func.invoke(Call::new().arg(Value::dict::<&str>([]))).is_ok());
    for bad in [
        Value::from(1),
        Value::from(2.0),
        Value::from("some text"),
        Value::from(true),
    ] {
        assert!(func.invoke(Call::new().arg(bad)).is_err());
    }

    let func3 = typed(
        unary("func3"),
        vec![TypeSpec::any_of([Kind::List, Kind::Tuple]).with_consistency(Consistency::enabled())],
        true,
    );
    assert!(func3.invoke(Call::new().arg(ints(&[1, 2, 3, 4, 5]))).is_ok());
    assert!(func3.invoke(Call::new().arg(100)).is_err());
    let mixed = Value::tuple([1, 2, 3, 4].map(Value::from).into_iter().chain([Value::from("some text")]));
    let err = func3.invoke(Call::new().arg(mixed)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeKind);
    assert_eq!(
        err.to_string(),
        "Each element of the 1st variable must have the same type."
    );

    let func4 = typed(
        unary("func4"),
        vec![
            TypeSpec::any_of([Kind::List, Kind::Tuple])
                .with_consistency(Consistency::restricted_to([Kind::Int, Kind::Float])),
        ],
        true,
    );
    let letters = Value::List(vec!["a".into(), "b".into(), "c".into()]);
    assert_eq!(
        kind_of(func4.invoke(Call::new().arg(letters))),
        Some(ErrorKind::TypeKind)
    );
    assert!(func4.invoke(Call::new().arg(ints(&[1, 2]))).is_ok());
}

#[test]
fn consistency_is_on_by_default() {
    let collect = accepted_types(
        Function::new(unary("collect"), |_| ()),
        vec![TypeSpec::exact(Kind::List)],
        TypeGuardOptions::default(),
    );
    let mixed = Value::List(vec![1.into(), 2.into(), "x".into()]);
    assert_eq!(
        kind_of(collect.invoke(Call::new().arg(mixed))),
        Some(ErrorKind::TypeKind)
    );
    assert!(collect.invoke(Call::new().arg(ints(&[1, 2, 3]))).is_ok());

    let restricted = |kinds: Vec<Kind>| {
        accepted_types(
            Function::new(unary("collect"), |_| ()),
            vec![TypeSpec::exact(Kind::List).with_consistency(Consistency::restricted_to(kinds))],
            TypeGuardOptions::default(),
        )
    };
    assert!(
        restricted(vec![Kind::Int])
            .invoke(Call::new().arg(ints(&[1, 2, 3])))
            .is_ok()
    );
    assert!(
        restricted(vec![Kind::Float])
            .invoke(Call::new().arg(ints(&[1, 2, 3])))
            .is_err()
    );
}

#[test]
fn types_array() {
    let func = typed(unary("func"), vec![TypeSpec::exact(Kind::NdArray)], true);
    let func2 = typed(unary("func2"), vec![TypeSpec::exact(Kind::NdArray)], false);

    assert!(func.invoke(Call::new().arg(array(&[]))).is_ok());
    for bad in [
        Value::from(1),
        Value::from(2.0),
        Value::from("some text"),
        Value::from(true),
    ] {
        assert!(func.invoke(Call::new().arg(bad)).is_err());
    }
    assert!(func2.invoke(Call::new().arg("some text")).is_ok());
}

#[test]
fn values_number() {
    let triple = Signature::new("func").param("input1").param("input2").param("input3");
    let func = valued(
        triple,
        vec![
            ValueSpec::new().range(1, 10).allow_none(),
            ValueSpec::new().min_value(5),
            ValueSpec::new().max_value(100).no_check(),
        ],
        true,
    );
    let pair = Signature::new("func2").param("input1").param("input2");
    let func2 = valued(
        pair,
        vec![ValueSpec::new().range(1, 10), ValueSpec::new().min_value(5)],
        false,
    );

    assert!(func.invoke(Call::with_args([5, 10, 2000])).is_ok());
    assert!(func.invoke(Call::new().arg(Value::None).arg(10).arg(2000)).is_ok());
    for bad in [
        Call::new().arg(5).arg(Value::None).arg(10),
        Call::with_args([0, 10, 10]),
        Call::with_args([15, 10, 10]),
        Call::with_args([5, 1, 10]),
    ] {
        assert_eq!(kind_of(func.invoke(bad)), Some(ErrorKind::ValueConstraint));
    }
    assert!(func2.invoke(Call::new().arg("some text").arg(Value::tuple([]))).is_ok());

    let specs = || {
        vec![
            ValueSpec::new().range(1, 10),
            ValueSpec::new().min_value(5),
            ValueSpec::new().max_value(100),
        ]
    };
    let func3 = valued(
        Signature::new("func3")
            .param("input1")
            .param_with_default("input2", 7.0)
            .param_with_default("input3", 3.0),
        specs(),
        true,
    );
    let func4 = valued(
        Signature::new("func4")
            .param("input1")
            .param_with_default("input2", 1.0)
            .param_with_default("input3", 3.0),
        specs(),
        true,
    );
    assert!(func3.invoke(Call::new().arg(2.0)).is_ok());
    assert!(func3.invoke(Call::new().arg(2.0).kwarg("input2", 6.0)).is_ok());
    assert!(
        func3
            .invoke(Call::new().arg(2.0).kwarg("input2", 6.0).kwarg("input3", 10.0))
            .is_ok()
    );
    assert!(func3.invoke(Call::new().arg(2.0).kwarg("input3", 10.0)).is_ok());
    assert!(
        func3
            .invoke(Call::new().kwarg("input3", 2.0).kwarg("input1", 1))
            .is_ok()
    );
    assert_eq!(
        kind_of(func3.invoke(Call::new())),
        Some(ErrorKind::Configuration)
    );
    assert_eq!(
        kind_of(func3.invoke(Call::new().kwarg("input1", 1.0).kwarg("input3", 101))),
        Some(ErrorKind::ValueConstraint)
    );
    // The default itself violates `minValue: 5`.
    assert_eq!(
        kind_of(func4.invoke(Call::new().kwarg("input1", 1.0))),
        Some(ErrorKind::ValueConstraint)
    );
}

#[test]
fn values_string() {
    let func1 = valued(unary("func1"), vec![ValueSpec::new().range_length(1, 10)], true);
    let func2 = valued(unary("func2"), vec![ValueSpec::new().min_length(5)], true);
    let func3 = valued(unary("func3"), vec![ValueSpec::new().max_length(10)], true);
    let func4 = valued(unary("func4"), vec![ValueSpec::new().one_of(["a", "b", "c"])], true);
    let func5 = valued(unary("func5"), vec![ValueSpec::new().one_of(["a", "b", "c"])], false);

    assert!(func1.invoke(Call::new().arg("asd")).is_ok());
    assert!(func2.invoke(Call::new().arg("asddsaasd")).is_ok());
    assert!(func3.invoke(Call::new().arg("asddsa")).is_ok());
    assert!(func4.invoke(Call::new().arg("b")).is_ok());
    assert!(func1.invoke(Call::new().arg("asdasddsaasddsa")).is_err());
    assert!(func1.invoke(Call::new().arg("")).is_err());
    assert!(func2.invoke(Call::new().arg("asd")).is_err());
    assert!(func3.invoke(Call::new().arg("asdasddsaasd")).is_err());
    assert!(func4.invoke(Call::new().arg("g")).is_err());
    assert!(func5.invoke(Call::new().arg(123)).is_ok());
}

#[test]
fn values_object() {
    let func1 = valued(unary("func1"), vec![ValueSpec::new().range_length(1, 10)], true);
    let func2 = valued(unary("func2"), vec![ValueSpec::new().min_length(5)], true);
    let func3 = valued(unary("func3"), vec![ValueSpec::new().max_length(10)], true);
    let func4 = valued(unary("func4"), vec![ValueSpec::new().max_length(10)], false);

    let dict3 = Value::dict([("f1", 1.into()), ("f2", 2.into()), ("f3", 3.into())]);
    let long: Vec<i64> = (1..=15).collect();
    let long_tuple = Value::Tuple(long.iter().copied().map(Value::Int).collect());

    assert!(func1.invoke(Call::new().arg(ints(&[1, 2, 3]))).is_ok());
    assert!(func1.invoke(Call::new().arg(dict3.clone())).is_ok());
    assert!(func2.invoke(Call::new().arg(ints(&[1, 2, 3, 4, 5, 6, 7, 8]))).is_ok());
    assert!(func3.invoke(Call::new().arg(ints(&[1, 2, 3, 4, 5, 6, 7, 8]))).is_ok());
    assert!(func1.invoke(Call::new().arg(long_tuple.clone())).is_err());
    assert!(func1.invoke(Call::new().arg(ints(&[]))).is_err());
    assert!(
        func2
            .invoke(Call::new().arg(Value::tuple([1.into(), 2.into(), 3.into()])))
            .is_err()
    );
    assert!(func2.invoke(Call::new().arg(dict3)).is_err());
    assert!(func3.invoke(Call::new().arg(long_tuple)).is_err());
    assert!(func4.invoke(Call::new().arg(123)).is_ok());
}

#[test]
fn values_array() {
    let func1 = valued(unary("func1"), vec![ValueSpec::new().range_length(1, 10)], true);
    let func2 = valued(unary("func2"), vec![ValueSpec::new().min_length(5)], true);
    let func3 = valued(unary("func3"), vec![ValueSpec::new().max_length(10)], true);
    let func4 = valued(unary("func4"), vec![ValueSpec::new().max_length(10)], false);
    let func5 = valued(unary("func5"), vec![ValueSpec::new().rows_max(10)], true);
    let func6 = valued(unary("func6"), vec![ValueSpec::new().cols_min(3)], true);
    let func7 = valued(unary("func7"), vec![ValueSpec::new().cols_range(2, 5)], true);
    let func8 = valued(
        unary("func8"),
        vec![ValueSpec::new().rows_range(2, 5).cols_range(2, 5).allow_none()],
        true,
    );

    assert!(func1.invoke(Call::new().arg(array(&[1.0, 2.0, 3.0]))).is_ok());
    let eight: Vec<f64> = (1..=8).map(f64::from).collect();
    assert!(func2.invoke(Call::new().arg(array(&eight))).is_ok());
    assert!(func3.invoke(Call::new().arg(array(&eight))).is_ok());

    assert!(func1.invoke(Call::new().arg(ones(&[2, 3, 5]))).is_err());
    assert!(func1.invoke(Call::new().arg(ones(&[1, 25]))).is_err());
    assert!(func1.invoke(Call::new().arg(array(&[]))).is_err());
    assert!(func2.invoke(Call::new().arg(array(&[1.0, 2.0, 3.0]))).is_err());
    assert!(func3.invoke(Call::new().arg(ones(&[1, 25]))).is_err());
    assert!(func4.invoke(Call::new().arg(123)).is_ok());
    assert!(func5.invoke(Call::new().arg(ones(&[20, 5]))).is_err());
    assert!(func6.invoke(Call::new().arg(ones(&[2, 2]))).is_err());
    assert!(func7.invoke(Call::new().arg(ones(&[3, 6]))).is_err());
    assert!(func8.invoke(Call::new().arg(ones(&[3, 6]))).is_err());
    assert!(func8.invoke(Call::new().arg(ones(&[6, 3]))).is_err());
    assert!(func8.invoke(Call::new().arg(Value::None)).is_ok());
}

#[test]
fn folded_array_reaches_the_operation() {
    let shape_of = Function::new(unary("shape_of"), |args| {
        args.get("input1")
            .and_then(Value::as_array)
            .map(|a| a.shape().to_vec())
    });
    let guarded = accepted_values(
        shape_of,
        vec![ValueSpec::new().range_length(1, 10)],
        ValueGuardOptions::default(),
    );
    let shape = guarded.invoke(Call::new().arg(ones(&[1, 6]))).unwrap();
    assert_eq!(shape, Some(vec![6, 1]));
}

#[test]
fn no_check_tolerates_malformed_shapes() {
    let func = valued(unary("func"), vec![ValueSpec::unchecked().max_length(1)], true);
    assert!(func.invoke(Call::new().arg(ones(&[4, 4, 4, 4]))).is_ok());
    assert!(func.invoke(Call::new().arg(Value::None)).is_ok());
}

#[test]
fn error_messages_name_position_and_function() {
    let pair = Signature::new("scale").param("x").param("factor");
    let func = valued(
        pair,
        vec![ValueSpec::new(), ValueSpec::new().range(1, 10)],
        true,
    );
    let err = func.invoke(Call::new().arg(0).kwarg("factor", 11)).unwrap_err();
    insta::assert_snapshot!(
        err,
        @"The 2nd argument of the function scale() has value out of the accepted range: [1, 10]."
    );
    let err = func.invoke(Call::new().arg(1)).unwrap_err();
    insta::assert_snapshot!(err, @"invalid number of arguments for scale(): 2 declared, 1 bound");
}
