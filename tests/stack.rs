use forth_vm::vm::*;

#[test]
fn test_lifo() {
    let mut stack = Stack::new(StackKind::Data, 5, 32);
    for value in [1, 2, 3] {
        stack.push(value).unwrap();
    }

    assert_eq!(stack.depth(), 3);
    assert_eq!(stack.stack_pointer(), 2);
    assert_eq!(stack.pop(), Ok(3));
    assert_eq!(stack.pop(), Ok(2));
    assert_eq!(stack.pop(), Ok(1));
    assert_eq!(stack.stack_pointer(), -1);
    assert!(stack.is_empty());
}

#[test]
fn test_fill_to_capacity() {
    let mut stack = Stack::new(StackKind::Data, 3, 32);
    for value in 0..3 {
        stack.push(value).unwrap();
    }
    assert!(stack.is_full());

    assert_eq!(stack.push(3), Err(Error::StackOverflow(StackKind::Data)));
    assert_eq!(stack.values(), vec![0, 1, 2]);
    assert_eq!(stack.stack_pointer(), 2);
}

#[test]
fn test_underflow() {
    let mut stack = Stack::new(StackKind::Return, 3, 32);

    assert_eq!(stack.pop(), Err(Error::StackUnderflow(StackKind::Return)));
    assert_eq!(stack.stack_pointer(), -1);

    stack.push(1).unwrap();
    stack.pop().unwrap();
    assert_eq!(stack.pop(), Err(Error::StackUnderflow(StackKind::Return)));
}

#[test]
fn test_pop_zeroes_cell() {
    let mut stack = Stack::new(StackKind::Data, 3, 32);
    stack.push(5).unwrap();
    stack.push(6).unwrap();
    stack.pop().unwrap();

    assert_eq!(stack.to_string(), " 5 <-TOS  0 0");
}

#[test]
fn test_flush() {
    let mut stack = Stack::new(StackKind::Data, 4, 32);
    stack.push(10).unwrap();
    stack.push(20).unwrap();
    stack.flush();

    assert!(stack.is_empty());
    assert_eq!(stack.to_string(), " 0 0 0 0");
    stack.push(30).unwrap();
    assert_eq!(stack.values(), vec![30]);
}

#[test]
fn test_push_wraps() {
    let mut stack = Stack::new(StackKind::Data, 4, 8);
    stack.push(200).unwrap();
    stack.push(-129).unwrap();
    stack.push(256).unwrap();

    assert_eq!(stack.values(), vec![-56, 127, 0]);
}

#[test]
fn test_zero_capacity() {
    let mut stack = Stack::new(StackKind::Return, 0, 16);

    assert!(stack.is_empty());
    assert!(stack.is_full());
    assert_eq!(stack.push(1), Err(Error::StackOverflow(StackKind::Return)));
    assert_eq!(stack.pop(), Err(Error::StackUnderflow(StackKind::Return)));
}

#[test]
#[should_panic]
fn test_invalid_width() {
    Stack::new(StackKind::Data, 4, 65);
}
