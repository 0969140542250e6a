//! Built-in sample programs, one per dialect, deliberately left unformatted.

use crate::dialect::Dialect;

const JAVASCRIPT: &str = r#"const fetchUsers=async(url)=>{const res=await fetch(url)
if(!res.ok){throw new Error("Request failed: "+res.status)}
return (await res.json()).map(u=>({id:u.id,name:u.name.trim()}))}

export default fetchUsers
"#;

const JSX: &str = r#"import {useState} from 'react'
export function Counter({start=0}){const [count,setCount]=useState(start)
return <div className="counter"><button onClick={()=>setCount(count-1)}>-</button><span>{count}</span>
<button onClick={()=>setCount(count+1)}>+</button></div>}
"#;

const TYPESCRIPT: &str = r#"interface User{id:number;name:string;email?:string}
type Lookup=Record<number,User>
export function index(users:User[]):Lookup{const out:Lookup={}
for(const u of users){out[u.id]=u}
return out}
"#;

const TSX: &str = r#"import React,{useState} from 'react'
type Props={items:string[];onPick:(item:string)=>void}
export const Picker=({items,onPick}:Props)=>{const [open,setOpen]=useState<boolean>(false)
return <ul className="picker">{open&&items.map(i=><li key={i} onClick={()=>onPick(i)}>{i}</li>)}
<li onClick={()=>setOpen(!open)}>{open?'close':'open'}</li></ul>}
"#;

pub fn sample_for(dialect: Dialect) -> &'static str {
    match dialect {
        Dialect::JavaScript => JAVASCRIPT,
        Dialect::Jsx => JSX,
        Dialect::TypeScript => TYPESCRIPT,
        Dialect::Tsx => TSX,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::detect;

    #[test]
    fn samples_are_detected_as_their_own_dialect() {
        for d in Dialect::ALL {
            assert_eq!(detect(sample_for(d)), d, "sample for {d}");
        }
    }
}
