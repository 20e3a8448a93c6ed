use super::*;

define_id! {
    /// test id
    pub struct TestId;
}

define_int_id! {
    /// test int id
    pub struct TestIntId;
}

#[test]
fn string_id_roundtrips_and_compares() {
    let a = TestId::new("abc");
    let b: TestId = "abc".into();
    assert_eq!(a, b);
    assert_eq!(a.as_str(), "abc");
    assert_eq!(a.to_string(), "abc");
}

#[test]
fn string_id_short_truncates() {
    let id = TestId::new("0123456789");
    assert_eq!(id.short(4), "0123");
    assert_eq!(id.short(100), "0123456789");
}

#[test]
fn int_id_wraps_i64() {
    let id = TestIntId::new(42);
    assert_eq!(id.get(), 42);
    assert_eq!(id.to_string(), "42");
    assert_eq!(TestIntId::from(7), TestIntId::new(7));
}

#[test]
fn uuid_id_gen_produces_unique_values() {
    let gen = UuidIdGen;
    let a = gen.next();
    let b = gen.next();
    assert_ne!(a, b);
    assert_eq!(a.len(), 36);
}

#[test]
fn sequential_id_gen_is_monotonic_and_prefixed() {
    let gen = SequentialIdGen::new("task");
    assert_eq!(gen.next(), "task-1");
    assert_eq!(gen.next(), "task-2");
}
