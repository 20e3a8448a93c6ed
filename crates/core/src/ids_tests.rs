use super::*;

#[test]
fn int_ids_are_distinct_newtypes_but_equal_by_value() {
    assert_eq!(StreamerId::new(1), StreamerId::new(1));
    assert_ne!(StreamerId::new(1).get(), StreamerId::new(2).get());
}

#[test]
fn task_id_generate_produces_unique_uuids() {
    let a = TaskId::generate();
    let b = TaskId::generate();
    assert_ne!(a, b);
    assert_eq!(a.as_str().len(), 36);
}
