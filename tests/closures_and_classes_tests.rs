// ABOUTME: Black-box coverage for closures and class/instance semantics via the public driver

use loxi::run_capturing;

#[test]
fn test_closure_keeps_declaring_environment_alive_after_block_exits() {
    let source = r#"
        var makeAdder;
        {
            var base = 10;
            func adder(x) {
                return base + x;
            }
            makeAdder = adder;
        }
        print makeAdder(5);
    "#;
    assert_eq!(run_capturing(source).unwrap(), "15\n");
}

#[test]
fn test_two_calls_to_the_same_factory_produce_independent_closures() {
    let source = r#"
        func makeCounter() {
            var n = 0;
            func bump() {
                n = n + 1;
                return n;
            }
            return bump;
        }
        var a = makeCounter();
        var b = makeCounter();
        print a();
        print a();
        print b();
    "#;
    assert_eq!(run_capturing(source).unwrap(), "1\n2\n1\n");
}

#[test]
fn test_method_extracted_into_a_variable_keeps_this_bound() {
    let source = r#"
        class Greeter {
            init(name) {
                this.name = name;
            }
            greet() {
                print "hello " + this.name;
            }
        }
        var g = Greeter("ada");
        var greetFn = g.greet;
        greetFn();
    "#;
    assert_eq!(run_capturing(source).unwrap(), "hello ada\n");
}

#[test]
fn test_method_assigned_into_a_field_keeps_this_bound_to_original_instance() {
    let source = r#"
        class Greeter {
            init(name) {
                this.name = name;
            }
            greet() {
                print "hello " + this.name;
            }
        }
        var a = Greeter("ada");
        var b = Greeter("grace");
        b.borrowed = a.greet;
        b.borrowed();
    "#;
    assert_eq!(run_capturing(source).unwrap(), "hello ada\n");
}

#[test]
fn test_super_call_keeps_this_bound_to_the_subclass_instance() {
    let source = r#"
        class A {
            whoAmI() {
                print "A sees " + this.label;
            }
        }
        class B < A {
            init(label) {
                this.label = label;
            }
            whoAmI() {
                super.whoAmI();
            }
        }
        B("a B instance").whoAmI();
    "#;
    assert_eq!(run_capturing(source).unwrap(), "A sees a B instance\n");
}

#[test]
fn test_inheritance_lookup_stops_at_nearest_overriding_ancestor() {
    let source = r#"
        class Grandparent { speak() { print "grandparent"; } }
        class Parent < Grandparent { speak() { print "parent"; } }
        class Child < Parent {}
        Child().speak();
    "#;
    assert_eq!(run_capturing(source).unwrap(), "parent\n");
}

#[test]
fn test_fields_are_independent_per_instance() {
    let source = r#"
        class Counter {
            init() {
                this.n = 0;
            }
            bump() {
                this.n = this.n + 1;
            }
        }
        var a = Counter();
        var b = Counter();
        a.bump();
        a.bump();
        b.bump();
        print a.n;
        print b.n;
    "#;
    assert_eq!(run_capturing(source).unwrap(), "2\n1\n");
}
