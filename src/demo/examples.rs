//! The example routine. Its body is shown on the page, each trace call
//! followed by the value it printed.

use crate::core::TraceSink;
use crate::demo::functional::{
    arg, compose, curry, invoke, ncurry, partial, pluck, rcurry, rncurry, sequence, CallError,
    Func, Value, HOLE,
};
use crate::{trace, vals};

pub fn examples(t: &mut dyn TraceSink) -> Result<(), CallError> {
    // create an unspecialized function that just lists its arguments
    let list = Func::new("list", |args| Ok(Value::List(args.to_vec())));
    trace!(t, "list is a", list.clone());

    // specialize the first and third parameters
    let f2 = partial(&list, vals![1, HOLE, 2, HOLE]);
    trace!(t, "f2 3, 4 ->", f2.call(vals![3, 4])?);

    // specialize the first two parameters (same as currying)
    let f3 = partial(&list, vals![1, 2, HOLE, HOLE]);
    trace!(t, "f3 4, 5 ->", f3.call(vals![4, 5])?);

    // if not all the parameters are supplied, the result is a function...
    trace!(t, f2.call(vals![4])?);
    // ...which can be applied until the function is saturated.
    trace!(t, "f2 3 then 4 ->", f2.call(vals![3])?.call(vals![4])?);
    trace!(t, f3.call(vals![HOLE, 3])?.call(vals![4])?);
    trace!(t, f3.call(vals![3])?.call(vals![4])?);
    trace!(t, partial(&list, vals![HOLE, HOLE, HOLE, 1]).call(vals![2, HOLE, 3])?.call(vals![4])?);

    // specialize a string function on its trailing arguments
    let replace = Func::new("replace", |args| {
        let text = arg("replace", args, 0)?.to_string();
        let from = arg("replace", args, 1)?.to_string();
        let to = arg("replace", args, 2)?.to_string();
        Ok(Value::from(text.replace(&from, &to)))
    });
    let lisp = partial(&replace, vals![HOLE, "s", "th"]);
    trace!(t, lisp.call(vals!["substitute my esses"])?);

    // use right curry to create 'halve' and 'double' functions out of divide
    let divide = Func::new("divide", |args| {
        Ok(Value::from(arg("divide", args, 0)?.as_num()? / arg("divide", args, 1)?.as_num()?))
    });
    let halve = rcurry(&divide, vals![2]);
    let double = rcurry(&divide, vals![0.5]);
    trace!(t, "halve 10", halve.call(vals![10])?);
    trace!(t, "double 10", double.call(vals![10])?);

    // curries are like Haskell sections
    // (10 /) 2
    trace!(t, curry(&divide, vals![10]).call(vals![2])?);
    // (/ 2) 10
    trace!(t, rcurry(&divide, vals![2]).call(vals![10])?);
    // while partials are like math function syntax
    // (10 / _) 2
    trace!(t, partial(&divide, vals![10, HOLE]).call(vals![2])?);
    // (_ / 2) 10
    trace!(t, partial(&divide, vals![HOLE, 2]).call(vals![10])?);

    // ncurry and rncurry wait until they're fully saturated before
    // applying the function.  [r]curry can't because it doesn't
    // know how many arguments the underlying function wants.
    trace!(t, curry(&list, vals![1, 2]).call(vals![3])?);
    trace!(t, ncurry(&list, 4, vals![1, 2]).call(vals![3])?);
    trace!(t, ncurry(&list, 4, vals![1, 2]).call(vals![3])?.call(vals![4])?);
    trace!(t, ncurry(&list, 4, vals![1, 2]).call(vals![3, 4])?);
    trace!(t, rncurry(&list, 4, vals![1, 2]).call(vals![3])?);
    trace!(t, rncurry(&list, 4, vals![1, 2]).call(vals![3, 4])?);

    // pluck and invoke
    trace!(t, pluck("length").call(vals!["a string"])?);
    trace!(t, invoke("reverse", vals![]).call(vals![vals![1, 2, 3, 4]])?);

    // compose() and sequence() compose sequences of functions
    // backwards and forwards, respectively
    let concat = Func::new("concat", |args| {
        Ok(Value::from(args.iter().map(Value::to_string).collect::<String>()))
    });
    let prepender = |prefix: &str| curry(&concat, vals![prefix]);
    trace!(t, prepender("im").call(vals!["possible"])?);
    trace!(t, compose(vec![prepender("hemi"), prepender("demi")]).call(vals!["quaver"])?);
    trace!(t, sequence(vec![prepender("hemi"), prepender("demi")]).call(vals!["quaver"])?);
    // this uses map() from the standard library
    trace!(t, compose(["hemi", "demi", "semi"].into_iter().map(prepender).collect()).call(vals!["quaver"])?);

    Ok(())
}
