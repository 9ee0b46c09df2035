// ABOUTME: End-to-end scenarios run through the public `loxi::run_capturing` driver

use loxi::run_capturing;

#[test]
fn test_inheritance_and_super_dispatch() {
    let source = r#"
        class A {
            test() {
                print "AAA";
            }
        }
        class B < A {
            test() {
                super.test();
                print "BBB";
            }
        }
        B().test();
    "#;
    assert_eq!(run_capturing(source).unwrap(), "AAA\nBBB\n");
}

#[test]
fn test_if_else_branch_selection() {
    let source = r#"
        if (1 > 2) {
            print 22;
        } else {
            print 33;
        }
    "#;
    assert_eq!(run_capturing(source).unwrap(), "33\n");
}

#[test]
fn test_for_loop_counts_up() {
    let source = "for (var i = 0; i < 3; i = i + 1) { print i; }";
    assert_eq!(run_capturing(source).unwrap(), "0\n1\n2\n");
}

#[test]
fn test_closure_counter_maker() {
    let source = r#"
        func makeCounter() {
            var count = 0;
            func increment() {
                count = count + 1;
                return count;
            }
            return increment;
        }
        var counter = makeCounter();
        print counter();
        print counter();
        print counter();
    "#;
    assert_eq!(run_capturing(source).unwrap(), "1\n2\n3\n");
}

#[test]
fn test_class_init_sets_fields() {
    let source = r#"
        class Box {
            init(value) {
                this.value = value;
            }
        }
        var b = Box(7);
        print b.value;
    "#;
    assert_eq!(run_capturing(source).unwrap(), "7\n");
}

#[test]
fn test_string_concat_and_number_addition_share_plus() {
    let source = r#"
        print "ab" + "cd";
        print 1 + 2;
    "#;
    assert_eq!(run_capturing(source).unwrap(), "abcd\n3\n");
}

#[test]
fn test_method_lookup_reaches_nearest_ancestor() {
    let source = r#"
        class Animal { speak() { print "generic noise"; } }
        class Dog < Animal {}
        class Puppy < Dog {}
        Puppy().speak();
    "#;
    assert_eq!(run_capturing(source).unwrap(), "generic noise\n");
}

#[test]
fn test_undefined_variable_reported_as_runtime_error() {
    let err = run_capturing("print ghost;").unwrap_err();
    assert!(err.to_string().contains("ghost"));
}

#[test]
fn test_lex_and_parse_errors_are_distinguishable_from_runtime_errors() {
    assert!(run_capturing("var x = $;").is_err());
    assert!(run_capturing("1 = 2;").is_err());
}
