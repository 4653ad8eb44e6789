use lamina::data::PriorityQueue;

#[test]
fn priority_queue_pops_in_predicate_order() {
    let mut q = PriorityQueue::new(|a: &i32, b: &i32| a < b);
    q.extend([5, 1, 4, 2, 3, 0]);
    assert_eq!(q.len(), 6);
    assert_eq!(q.peek(), Some(&0));

    let mut out = Vec::new();
    while let Some(v) = q.pop() {
        out.push(v);
    }
    assert_eq!(out, vec![0, 1, 2, 3, 4, 5]);
    assert!(q.is_empty());
}

#[test]
fn priority_queue_returns_none_when_empty() {
    let mut q = PriorityQueue::new(|a: &u8, b: &u8| a < b);
    assert_eq!(q.pop(), None);
    assert_eq!(q.peek(), None);
}

#[test]
fn priority_queue_supports_interleaved_push_and_pop() {
    let mut q = PriorityQueue::new(|a: &i32, b: &i32| a > b);
    q.push(3);
    q.push(7);
    assert_eq!(q.pop(), Some(7));
    q.push(5);
    q.push(1);
    assert_eq!(q.pop(), Some(5));
    assert_eq!(q.pop(), Some(3));
    assert_eq!(q.pop(), Some(1));
    assert_eq!(q.pop(), None);
}

#[test]
fn priority_queue_accepts_a_non_strict_predicate() {
    // `<=` treats equal items as preceding each other; every item must still come out once.
    let mut q = PriorityQueue::new(|a: &(u8, char), b: &(u8, char)| a.0 <= b.0);
    q.extend([(1, 'a'), (0, 'b'), (1, 'c'), (0, 'd')]);
    let mut out = Vec::new();
    while let Some(v) = q.pop() {
        out.push(v);
    }
    assert_eq!(out.len(), 4);
    assert!(out[..2].iter().all(|v| v.0 == 0));
    assert!(out[2..].iter().all(|v| v.0 == 1));
}
